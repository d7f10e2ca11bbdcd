//! Administrative search criteria for task templates.

use super::{FrequencyName, Priority, SectorName, TaskTemplate};

/// Columns the free-text criterion is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextScope {
    /// Identifier, activity, and planner.
    #[default]
    Template,
    /// Identifier and activity only.
    IdentifierAndActivity,
}

impl TextScope {
    /// Returns `true` when the planner label takes part in text matching.
    #[must_use]
    pub const fn includes_planner(self) -> bool {
        matches!(self, Self::Template)
    }
}

/// Search criteria for listing templates. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFilter {
    sector: Option<SectorName>,
    priority: Option<Priority>,
    frequency: Option<FrequencyName>,
    active: Option<bool>,
    business_day: Option<bool>,
    text: Option<String>,
    text_scope: TextScope,
}

impl TemplateFilter {
    /// Creates a filter that matches every template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to one sector.
    #[must_use]
    pub fn with_sector(mut self, sector: SectorName) -> Self {
        self.sector = Some(sector);
        self
    }

    /// Restricts results to one priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts results to one frequency.
    #[must_use]
    pub fn with_frequency(mut self, frequency: FrequencyName) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Restricts results by the active flag.
    #[must_use]
    pub const fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Restricts results by the working-day flag.
    #[must_use]
    pub const fn with_business_day(mut self, business_day: bool) -> Self {
        self.business_day = Some(business_day);
        self
    }

    /// Keeps templates whose identifier, activity, or planner contains `text`,
    /// ignoring case. Blank text is ignored.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let raw = text.into();
        let trimmed = raw.trim();
        self.text = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Narrows which columns the free-text criterion searches.
    #[must_use]
    pub const fn with_text_scope(mut self, scope: TextScope) -> Self {
        self.text_scope = scope;
        self
    }

    /// Returns the sector criterion.
    #[must_use]
    pub const fn sector(&self) -> Option<&SectorName> {
        self.sector.as_ref()
    }

    /// Returns the priority criterion.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the frequency criterion.
    #[must_use]
    pub const fn frequency(&self) -> Option<&FrequencyName> {
        self.frequency.as_ref()
    }

    /// Returns the active-flag criterion.
    #[must_use]
    pub const fn active(&self) -> Option<bool> {
        self.active
    }

    /// Returns the working-day criterion.
    #[must_use]
    pub const fn business_day(&self) -> Option<bool> {
        self.business_day
    }

    /// Returns the free-text criterion.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the columns searched by the free-text criterion.
    #[must_use]
    pub const fn text_scope(&self) -> TextScope {
        self.text_scope
    }

    /// Returns `true` when `template` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, template: &TaskTemplate) -> bool {
        let details = template.details();
        self.sector.as_ref().is_none_or(|sector| *sector == details.sector)
            && self.priority.is_none_or(|priority| priority == details.priority)
            && self
                .frequency
                .as_ref()
                .is_none_or(|frequency| *frequency == details.frequency)
            && self.active.is_none_or(|active| active == details.active)
            && self
                .business_day
                .is_none_or(|business_day| business_day == details.business_day)
            && self.text.as_deref().is_none_or(|text| matches_text(template, text, self.text_scope))
    }
}

fn matches_text(template: &TaskTemplate, text: &str, scope: TextScope) -> bool {
    let needle = text.to_lowercase();
    let details = template.details();
    let haystacks = [
        template.task_id().map(|task_id| task_id.as_str()),
        Some(details.activity.as_str()),
        scope.includes_planner().then(|| details.planner.as_str()),
    ];
    haystacks
        .into_iter()
        .flatten()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
}
