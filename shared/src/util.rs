/// Treat empty or whitespace-only strings as absent.
///
/// Query strings like `?name=` arrive as `Some("")`; every list filter in the
/// API considers that the same as not filtering at all.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some(" eng ")), Some("eng"));
    }
}
