use flate2::{Compression, write::GzEncoder};
use std::io::{self, Write};

/// Concatenates texts in order, with no separator.
pub fn join<S: AsRef<str>>(texts: &[S]) -> String {
    let mut joined = String::with_capacity(texts.iter().map(|t| t.as_ref().len()).sum());
    for text in texts {
        joined.push_str(text.as_ref());
    }
    joined
}

/// UTF-8 byte length.
pub fn size(text: &str) -> u64 {
    text.len() as u64
}

/// Length of the gzip encoding of `text` at best compression.
pub fn gz_size(text: &str) -> io::Result<u64> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(text.as_bytes())?;
    Ok(encoder.finish()?.len() as u64)
}

pub fn measure(text: &str, gzip: bool) -> io::Result<u64> {
    if gzip { gz_size(text) } else { Ok(size(text)) }
}
