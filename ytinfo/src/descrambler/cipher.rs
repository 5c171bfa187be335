use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Error, Result};
use super::Decipher;

static JS_FUNCTION_REGEX: Lazy<Regex> = Lazy::new(||
    Regex::new(r"\w+\.(\w+)\(\w,(\d+)\)").unwrap()
);

/// One step of the signature transformation, as found in the player JavaScript.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transform {
    /// `function(a){a.reverse()}`
    Reverse,
    /// `function(a,b){a.splice(0,b)}`
    Splice(usize),
    /// `function(a,b){var c=a[0];a[0]=a[b%a.length];a[b%a.length]=c}`
    Swap(usize),
}

impl Transform {
    fn apply(self, signature: &mut Vec<char>) {
        match self {
            Transform::Reverse => signature.reverse(),
            Transform::Splice(n) => { signature.drain(..n.min(signature.len())); }
            Transform::Swap(_) if signature.is_empty() => {}
            Transform::Swap(n) => {
                let len = signature.len();
                signature.swap(0, n % len);
            }
        }
    }
}

/// The [`Decipher`] used by YouTube's web player: a fixed sequence of [`Transform`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cipher {
    transform_plan: Vec<Transform>,
}

impl Cipher {
    #[inline]
    pub fn new(transform_plan: Vec<Transform>) -> Self {
        Self { transform_plan }
    }

    /// Extracts the transform plan from the player JavaScript (`base.js`).
    pub fn from_js(js: &str) -> Result<Self> {
        let calls = get_transform_plan(js)?;

        let var = calls
            .first()
            .and_then(|call| call.split('.').next())
            .ok_or_else(|| Error::Cipher("the player JavaScript has an empty transform plan".into()))?;
        let transform_map = get_transform_map(js, var)?;

        let transform_plan = calls
            .iter()
            .map(|call| {
                let (name, argument) = parse_function(call)?;
                let kind = transform_map
                    .get(name)
                    .ok_or_else(|| Error::Cipher(format!(
                        "no matching transform function for `{}`", call
                    ).into()))?;
                Ok(kind.with_argument(argument))
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!("transform plan: {:?}", transform_plan);
        Ok(Self { transform_plan })
    }

    #[inline]
    pub fn transform_plan(&self) -> &[Transform] {
        &self.transform_plan
    }
}

impl Decipher for Cipher {
    fn decrypt_signature(&self, signature: &str) -> Result<String> {
        let mut chars = signature.chars().collect::<Vec<_>>();
        for transform in self.transform_plan.iter() {
            transform.apply(&mut chars);
        }

        if chars.is_empty() {
            return Err(Error::Cipher(format!(
                "the transform plan {:?} left nothing of the signature",
                self.transform_plan
            ).into()));
        }

        Ok(chars.into_iter().collect())
    }
}

/// A transform function, before the argument of a particular call is known.
#[derive(Clone, Copy, Debug)]
enum TransformKind {
    Reverse,
    Splice,
    Swap,
}

impl TransformKind {
    #[inline]
    fn with_argument(self, argument: usize) -> Transform {
        match self {
            TransformKind::Reverse => Transform::Reverse,
            TransformKind::Splice => Transform::Splice(argument),
            TransformKind::Swap => Transform::Swap(argument),
        }
    }
}

fn parse_function(js_func: &str) -> Result<(&str, usize)> {
    let captures = JS_FUNCTION_REGEX
        .captures(js_func)
        .ok_or_else(|| Error::Cipher(format!(
            "the JS_FUNCTION_REGEX `{}` did not match the JavaScript function {}",
            *JS_FUNCTION_REGEX, js_func
        ).into()))?;

    match (captures.get(1), captures.get(2)) {
        (Some(name), Some(arg)) => {
            let arg = arg
                .as_str()
                .parse::<usize>()
                .map_err(|_| Error::Cipher(format!(
                    "expected the argument of `{}` to be an int, but found: `{}`",
                    name.as_str(), arg.as_str()
                ).into()))?;
            Ok((name.as_str(), arg))
        }
        (name, arg) => Err(Error::Cipher(format!(
            "expected a JavaScript transformer function and an argument, got: `{:?}` and `{:?}`",
            name, arg
        ).into()))
    }
}

fn get_transform_plan(js: &str) -> Result<Vec<String>> {
    let name = regex::escape(get_initial_function_name(js)?);
    let pattern = Regex::new(&format!(r#"{}=function\(\w\)\{{[a-z=.(")]*;(.*);(?:.+)}}"#, name))
        .map_err(|e| Error::Cipher(e.to_string().into()))?;

    Ok(
        pattern
            .captures(js)
            .and_then(|c| c.get(1))
            .ok_or_else(|| Error::Cipher(format!(
                "could not extract the initial JavaScript function: {}",
                pattern
            ).into()))?
            .as_str()
            .split(';')
            .map(str::to_owned)
            .collect()
    )
}

fn get_initial_function_name(js: &str) -> Result<&str> {
    static FUNCTION_PATTERNS: Lazy<[Regex; 6]> = Lazy::new(|| [
        Regex::new(r"\b[cs]\s*&&\s*[adf]\.set\([^,]+\s*,\s*encodeURIComponent\s*\(\s*(?P<sig>[a-zA-Z0-9$]+)\(").unwrap(),
        Regex::new(r"\b[a-zA-Z0-9]+\s*&&\s*[a-zA-Z0-9]+\.set\([^,]+\s*,\s*encodeURIComponent\s*\(\s*(?P<sig>[a-zA-Z0-9$]+)\(").unwrap(),
        Regex::new(r#"(?:\b|[^a-zA-Z0-9$])(?P<sig>[a-zA-Z0-9$]{2})\s*=\s*function\(\s*a\s*\)\s*\{\s*a\s*=\s*a\.split\(\s*""\s*\)"#).unwrap(),
        Regex::new(r#"(?P<sig>[a-zA-Z0-9$]+)\s*=\s*function\(\s*a\s*\)\s*\{\s*a\s*=\s*a\.split\(\s*""\s*\)"#).unwrap(),
        Regex::new(r#"["']signature["']\s*,\s*(?P<sig>[a-zA-Z0-9$]+)\("#).unwrap(),
        Regex::new(r"\.sig\|\|(?P<sig>[a-zA-Z0-9$]+)\(").unwrap(),
    ]);

    FUNCTION_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(js))
        .and_then(|c| c.name("sig"))
        .map(|sig| sig.as_str())
        .ok_or_else(|| Error::Cipher("could not find the JavaScript signature function name".into()))
}

fn get_transform_map(js: &str, var: &str) -> Result<HashMap<String, TransformKind>> {
    let transform_object = get_transform_object(js, var)?;
    let mut mapper = HashMap::new();

    for obj in transform_object.split(", ") {
        // AJ:function(a){a.reverse()} => AJ, function(a){a.reverse()}
        let (name, function) = obj
            .split_once(':')
            .ok_or_else(|| Error::Cipher(format!(
                "expected the transform-object to contain at least one ':', got {}",
                obj
            ).into()))?;
        mapper.insert(name.trim().to_owned(), map_function(function)?);
    }

    Ok(mapper)
}

fn map_function(js_func: &str) -> Result<TransformKind> {
    static MAPPER: Lazy<[(Regex, TransformKind); 4]> = Lazy::new(|| [
        // function(a){a.reverse()}
        (Regex::new(r"\{\w\.reverse\(\)}").unwrap(), TransformKind::Reverse),
        // function(a,b){a.splice(0,b)}
        (Regex::new(r"\{\w\.splice\(0,\w\)}").unwrap(), TransformKind::Splice),
        // function(a,b){var c=a[0];a[0]=a[b%a.length];a[b%a.length]=c}
        (Regex::new(r"\{var\s\w=\w\[0];\w\[0]=\w\[\w%\w.length];\w\[\w%\w.length]=\w}").unwrap(), TransformKind::Swap),
        // function(a,b){var c=a[0];a[0]=a[b%a.length];a[b]=c}
        (Regex::new(r"\{var\s\w=\w\[0];\w\[0]=\w\[\w%\w.length];\w\[\w]=\w}").unwrap(), TransformKind::Swap),
    ]);

    MAPPER
        .iter()
        .find(|(pattern, _kind)| pattern.is_match(js_func))
        .map(|(_pattern, kind)| *kind)
        .ok_or_else(|| Error::Cipher(format!(
            "could not map the JavaScript function `{}` to any Rust equivalent",
            js_func
        ).into()))
}

fn get_transform_object(js: &str, var: &str) -> Result<String> {
    let pattern = Regex::new(&format!(r"var {}=\{{((?s).*?)}};", regex::escape(var)))
        .map_err(|e| Error::Cipher(e.to_string().into()))?;

    Ok(
        pattern
            .captures(js)
            .and_then(|c| c.get(1))
            .ok_or_else(|| Error::Cipher(format!(
                "could not extract the transform-object `{}`",
                var
            ).into()))?
            .as_str()
            .replace('\n', " ")
    )
}
