/// Run-wide switches that affect every insertion.
#[derive(Clone, Debug, Default)]
pub struct TreeOptions {
    /// Comma separated `Kind`, `Kind/Name` or `all` selecting objects whose
    /// non-readiness conditions should be shown.
    pub show_other_conditions: String,
    /// Keep objects that would otherwise be hidden as echoes of their parent.
    pub disable_no_echo: bool,
    /// Never group siblings with the same readiness.
    pub disable_grouping: bool,
}

/// Per-insertion options.
#[derive(Clone, Debug, Default)]
pub struct AddOptions {
    /// Name shown in front of the object, e.g. "ControlPlane" for a
    /// KubeadmControlPlane.
    pub meta_name: Option<String>,
    /// Children of this object are grouped when their readiness is equivalent.
    pub grouping_object: bool,
    /// Hide the object if it is ready or restates its parent's readiness.
    pub no_echo: bool,
}

impl AddOptions {
    pub fn meta_name(mut self, name: impl Into<String>) -> Self {
        self.meta_name = Some(name.into());
        self
    }

    pub fn grouping_object(mut self, grouping: bool) -> Self {
        self.grouping_object = grouping;
        self
    }

    pub fn no_echo(mut self, no_echo: bool) -> Self {
        self.no_echo = no_echo;
        self
    }
}

/// True when `kind`/`name` is selected by a `show_other_conditions` filter.
pub fn matches_condition_filter(filter: &str, kind: &str, name: &str) -> bool {
    filter
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .any(|f| {
            if f.eq_ignore_ascii_case("all") {
                return true;
            }
            match f.split_once('/') {
                Some((k, n)) => k == kind && n == name,
                None => f == kind,
            }
        })
}
