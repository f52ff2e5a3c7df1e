#[cfg(feature = "simdutf8")]
use simdutf8::basic as simd_utf8;

/// Validates UTF-8 bytes and returns a borrowed `&str` on success.
#[inline]
pub fn validate(bytes: &[u8]) -> Result<&str, ()> {
    #[cfg(feature = "simdutf8")]
    {
        simd_utf8::from_utf8(bytes).map_err(|_| ())
    }

    #[cfg(not(feature = "simdutf8"))]
    {
        std::str::from_utf8(bytes).map_err(|_| ())
    }
}

/// Append the UTF-8 encoding of `code_point` to `out`.
///
/// Surrogates are not valid `char`s, so callers combine pairs first and
/// reject lone surrogates before getting here.
pub fn push_code_point(out: &mut Vec<u8>, code_point: u32) -> Result<(), ()> {
    let c = char::from_u32(code_point).ok_or(())?;
    let mut buf = [0_u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    Ok(())
}
