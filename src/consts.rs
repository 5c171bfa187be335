use std::path::PathBuf;

use once_cell::sync::Lazy;

use crate::utils::get_project_dirs;

pub static CACHE_DIR: Lazy<PathBuf> = Lazy::new(|| {
    if let Some(dir) = get_project_dirs() {
        return dir.cache_dir().to_path_buf();
    };
    PathBuf::from(".")
});

pub static LOG_FILE: Lazy<PathBuf> = Lazy::new(|| CACHE_DIR.join("ytresolve.log"));

pub static CONFIG_FILE: Lazy<Option<PathBuf>> =
    Lazy::new(|| get_project_dirs().map(|dirs| dirs.config_dir().join("config.toml")));

pub const INTRODUCTION: &str = r#"Usage: ytresolve [options] <url-or-id>

ytresolve turns a YouTube url (or a bare video id) into the direct urls of the video's streams.
It asks YouTube's get_video_info endpoint, so it needs nothing but the id of the video.

Options:
        -h or --help        Show this menu
        --files             Show the location of the ytresolve files
        --json              Print the streams as a JSON array (default)
        --table             Print one line per stream
        --decipher          Fetch the player JavaScript to decipher protected streams
        -v or --verbose     Write debug messages to the log file

Examples:
        ytresolve https://www.youtube.com/watch?v=dQw4w9WgXcQ
        ytresolve --table --decipher https://youtu.be/dQw4w9WgXcQ
        ytresolve dQw4w9WgXcQ
"#;
