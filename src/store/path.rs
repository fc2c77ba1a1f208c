//! Path keys for stored queries.
//!
//! A path is a list of components joined with `_`. Inside a component `-`
//! is written `-2D` and `_` is written `-5F`, so a component never contains
//! the separator and the encoding can always be reversed.

pub const SEPARATOR: char = '_';

/// Prefix shared by every global query path.
pub const GLOBAL_PREFIX: &str = "global_";

pub fn escape_component(component: &str) -> String {
    component.replace('-', "-2D").replace('_', "-5F")
}

pub fn unescape_component(component: &str) -> String {
    component.replace("-5F", "_").replace("-2D", "-")
}

pub fn path_from_components<S: AsRef<str>>(components: &[S]) -> String {
    components
        .iter()
        .map(|c| escape_component(c.as_ref()))
        .collect::<Vec<_>>()
        .join("_")
}

pub fn components_from_path(path: &str) -> Vec<String> {
    path.split(SEPARATOR).map(unescape_component).collect()
}

/// `global_queries_<identifier>`
pub fn global_query_path(identifier: &str) -> String {
    path_from_components(&["global", "queries", identifier])
}

/// `companies_<company>_queries_<identifier>`
pub fn company_query_path(company: &str, identifier: &str) -> String {
    path_from_components(&["companies", company, "queries", identifier])
}

/// Prefix of every path owned by `company`.
pub fn company_prefix(company: &str) -> String {
    format!("{}{}", path_from_components(&["companies", company]), SEPARATOR)
}
