//! Static metadata query documents.
//!
//! The query shape (site → datasources/workbooks → views fields) is a
//! fixed artifact of the metadata schema, not client logic. Variables
//! are bound at runtime from configuration.

/// Site content overview: certified datasources plus workbooks and their
/// views, narrowed to the configured projects.
pub const CONTENT_QUERY: &str = r#"
query tableauContent($tableau_site: String, $tableau_projects: [String]) {
    tableauSites(filter: {
        name: $tableau_site
    }) {
        name
        luid
        publishedDatasources(filter: {
            projectNameWithin: $tableau_projects
        }) {
            name
            luid
            projectName
            isCertified
            vizportalUrlId
        }
        workbooks(filter: {
            projectNameWithin: $tableau_projects
        }) {
            name
            luid
            createdAt
            projectName
            views {
                name
                path
                luid
                createdAt
                __typename
            }
        }
    }
}
"#;
