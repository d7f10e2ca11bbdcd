//! Search criteria for task runs.

use super::TaskRun;
use crate::template::domain::TemplateId;
use chrono::NaiveDate;

/// Search criteria for listing runs. Date bounds are inclusive; empty
/// criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFilter {
    due_from: Option<NaiveDate>,
    due_until: Option<NaiveDate>,
    done_from: Option<NaiveDate>,
    done_until: Option<NaiveDate>,
    text: Option<String>,
    template_ids: Option<Vec<TemplateId>>,
}

impl RunFilter {
    /// Creates a filter that matches every run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps runs due on or after `date`.
    #[must_use]
    pub const fn with_due_from(mut self, date: NaiveDate) -> Self {
        self.due_from = Some(date);
        self
    }

    /// Keeps runs due on or before `date`.
    #[must_use]
    pub const fn with_due_until(mut self, date: NaiveDate) -> Self {
        self.due_until = Some(date);
        self
    }

    /// Keeps runs completed on or after `date`.
    #[must_use]
    pub const fn with_done_from(mut self, date: NaiveDate) -> Self {
        self.done_from = Some(date);
        self
    }

    /// Keeps runs completed on or before `date`.
    #[must_use]
    pub const fn with_done_until(mut self, date: NaiveDate) -> Self {
        self.done_until = Some(date);
        self
    }

    /// Keeps runs whose template identifier or activity contains `text`,
    /// ignoring case. Blank text is ignored.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let value = text.into();
        let trimmed = value.trim();
        self.text = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Keeps runs belonging to one of `template_ids`.
    #[must_use]
    pub fn with_templates(mut self, template_ids: impl IntoIterator<Item = TemplateId>) -> Self {
        self.template_ids = Some(template_ids.into_iter().collect());
        self
    }

    /// Returns the free-text criterion on the owning template.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the template restriction, if any.
    #[must_use]
    pub fn template_ids(&self) -> Option<&[TemplateId]> {
        self.template_ids.as_deref()
    }

    /// Returns the inclusive due-date bounds.
    #[must_use]
    pub const fn due_range(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (self.due_from, self.due_until)
    }

    /// Returns the inclusive done-date bounds.
    #[must_use]
    pub const fn done_range(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (self.done_from, self.done_until)
    }

    /// Returns `true` when `run` satisfies the date and template criteria.
    ///
    /// The text criterion needs the owning template and is resolved into a
    /// template restriction before a repository sees the filter.
    #[must_use]
    pub fn matches(&self, run: &TaskRun) -> bool {
        within(run.due_date(), self.due_from, self.due_until)
            && within(run.done_date(), self.done_from, self.done_until)
            && self
                .template_ids
                .as_ref()
                .is_none_or(|ids| ids.contains(&run.template_id()))
    }
}

fn within(value: Option<NaiveDate>, from: Option<NaiveDate>, until: Option<NaiveDate>) -> bool {
    if from.is_none() && until.is_none() {
        return true;
    }
    value.is_some_and(|date| {
        from.is_none_or(|lower| date >= lower) && until.is_none_or(|upper| date <= upper)
    })
}
