/// Blank category filters mean "all categories".
pub fn normalize_category_filter(category: Option<&str>) -> Option<&str> {
    category.map(str::trim).filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_category_filter() {
        assert_eq!(normalize_category_filter(Some(" Food ")), Some("Food"));
        assert_eq!(normalize_category_filter(Some("   ")), None);
        assert_eq!(normalize_category_filter(None), None);
    }
}
