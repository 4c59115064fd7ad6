//! Utility functions and types.

/// Splits a list of names separated by commas and/or whitespace, skipping
/// empty elements.
///
/// ```
/// use rdkafka_conf::util::split_list;
///
/// let names: Vec<&str> = split_list("range, roundrobin  sticky,").collect();
/// assert_eq!(names, vec!["range", "roundrobin", "sticky"]);
/// ```
pub fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
}

/// Formats a pointer the way the configuration dump shows callbacks and
/// opaques: the address when set, an empty string otherwise.
pub(crate) fn format_ptr<T: ?Sized>(ptr: Option<*const T>) -> String {
    match ptr {
        Some(p) => format!("{:p}", p),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_separators() {
        let names: Vec<&str> = split_list(" a,b\tc ,, d").collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
        assert_eq!(split_list("").count(), 0);
    }

    #[test]
    fn format_ptr_null() {
        assert_eq!(format_ptr::<u8>(None), "");
        let x = 5u8;
        assert!(format_ptr(Some(&x as *const u8)).starts_with("0x"));
    }
}
