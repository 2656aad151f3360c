//! Category legend filter.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    Neutral,
    Highlighted,
    Dimmed,
}

#[derive(Debug, Default)]
pub struct CategoryFilter {
    active: Option<String>,
}

impl CategoryFilter {
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Selecting the active category again clears the filter.
    pub fn toggle(&mut self, category: &str) {
        if self.active.as_deref() == Some(category) {
            self.active = None;
        } else {
            self.active = Some(category.to_string());
        }
    }

    pub fn clear(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// A document click clears the filter unless it landed in the legend or on
    /// a project.
    pub fn clears_on_click(&self, in_legend: bool, on_project: bool) -> bool {
        self.active.is_some() && !in_legend && !on_project
    }
}

/// Legend entries and projects share one marking rule: neutral with no
/// filter, highlighted on a match, dimmed otherwise.
pub fn mark_for(active: Option<&str>, category: Option<&str>) -> Mark {
    match active {
        None => Mark::Neutral,
        Some(active) if category == Some(active) => Mark::Highlighted,
        Some(_) => Mark::Dimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_category_twice_clears() {
        let mut filter = CategoryFilter::default();
        filter.toggle("sound");
        assert_eq!(mark_for(filter.active(), Some("sound")), Mark::Highlighted);
        filter.toggle("sound");
        assert_eq!(filter.active(), None);
        assert_eq!(mark_for(filter.active(), Some("sound")), Mark::Neutral);
        assert_eq!(mark_for(filter.active(), Some("code")), Mark::Neutral);
    }

    #[test]
    fn switching_category_dims_previous() {
        let mut filter = CategoryFilter::default();
        filter.toggle("sound");
        filter.toggle("code");
        assert_eq!(filter.active(), Some("code"));
        assert_eq!(mark_for(filter.active(), Some("sound")), Mark::Dimmed);
        assert_eq!(mark_for(filter.active(), None), Mark::Dimmed);
    }

    #[test]
    fn outside_click_rule() {
        let mut filter = CategoryFilter::default();
        assert!(!filter.clears_on_click(false, false));
        filter.toggle("sound");
        assert!(!filter.clears_on_click(true, false));
        assert!(!filter.clears_on_click(false, true));
        assert!(filter.clears_on_click(false, false));
    }
}
