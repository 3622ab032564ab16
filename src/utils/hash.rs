//! Content hashing using blake3.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let hex = hash::digest(b"<feed/>"); // 64 hex chars
//! let tag = hash::etag(b"<feed/>");   // "\"<64 hex chars>\""
//! ```

/// Compute the blake3 digest of `data` as lowercase hex.
#[inline]
pub fn digest<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    hex::encode(blake3::hash(data.as_ref()).as_bytes())
}

/// Strong HTTP entity tag for `data` (quoted hex digest).
pub fn etag<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    format!("\"{}\"", digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable() {
        assert_eq!(digest("hello world"), digest(b"hello world"));
        assert_eq!(digest("hello world").len(), 64);
        assert_ne!(digest("hello world"), digest("goodbye world"));
    }

    #[test]
    fn test_etag_is_quoted() {
        let tag = etag("<feed/>");
        assert!(tag.starts_with('"') && tag.ends_with('"'));
        assert_eq!(tag.len(), 66);
        assert_eq!(&tag[1..65], digest("<feed/>"));
    }
}
