//! Table enhancement classification.
//!
//! Small tables stay plain; tables with enough data rows are marked as
//! eligible for client-side sorting and filtering. The classification is
//! advisory: the page script decides whether to act on it.

/// Threshold policy for [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TablePolicy {
    /// Minimum number of body rows (header excluded) for an eligible table.
    pub min_rows: usize,
}

impl Default for TablePolicy {
    fn default() -> Self {
        Self { min_rows: 3 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TableClass {
    Plain,
    Eligible,
}

impl TableClass {
    /// Value of the `data-enhance` attribute.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Eligible => "eligible",
        }
    }
}

/// One rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TableSummary {
    /// Body rows, header excluded.
    pub rows: usize,
    pub class: TableClass,
}

#[must_use]
pub fn classify(data_rows: usize, policy: &TablePolicy) -> TableClass {
    if data_rows >= policy.min_rows {
        TableClass::Eligible
    } else {
        TableClass::Plain
    }
}
