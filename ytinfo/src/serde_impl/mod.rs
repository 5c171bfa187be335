pub(crate) mod signature_cipher;
