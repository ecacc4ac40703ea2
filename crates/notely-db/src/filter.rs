//! SQL rendering of [`NoteFilter`].
//!
//! Produces a parameterized WHERE clause fragment over the `note n` alias.
//! User text is always bound, never interpolated.

use notely_core::NoteFilter;

use crate::escape_like;

/// Type-safe parameter binding for SQL queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    /// Boolean parameter.
    Bool(bool),
    /// String parameter.
    String(String),
}

/// Bind a slice of [`QueryParam`] onto a sqlx query, in order.
macro_rules! bind_filter_params {
    ($query:expr, $params:expr) => {{
        let mut q = $query;
        for param in $params {
            q = match param {
                $crate::filter::QueryParam::Bool(b) => q.bind(*b),
                $crate::filter::QueryParam::String(s) => q.bind(s.clone()),
            };
        }
        q
    }};
}
pub(crate) use bind_filter_params;

/// Generates the WHERE clause for a note filter.
///
/// # Example
///
/// ```rust,ignore
/// let filter = NoteFilter { tag: Some("rust".into()), ..Default::default() };
/// let (sql, params) = NoteFilterQueryBuilder::new(&filter, 0).build();
/// // sql: "n.is_archived = $1 AND $2 = ANY(n.tags)"
/// ```
pub struct NoteFilterQueryBuilder<'a> {
    filter: &'a NoteFilter,
    param_offset: usize,
}

impl<'a> NoteFilterQueryBuilder<'a> {
    /// Create a new builder.
    ///
    /// * `param_offset` - number of parameters already bound before the clause
    pub fn new(filter: &'a NoteFilter, param_offset: usize) -> Self {
        Self {
            filter,
            param_offset,
        }
    }

    /// Build the clause and the parameters in placeholder order.
    pub fn build(&self) -> (String, Vec<QueryParam>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        let mut param_idx = self.param_offset;

        param_idx += 1;
        clauses.push(format!("n.is_archived = ${}", param_idx));
        params.push(QueryParam::Bool(self.filter.archived));

        if let Some(category) = &self.filter.category {
            param_idx += 1;
            clauses.push(format!("n.category = ${}", param_idx));
            params.push(QueryParam::String(category.clone()));
        }

        if let Some(tag) = &self.filter.tag {
            param_idx += 1;
            clauses.push(format!("${} = ANY(n.tags)", param_idx));
            params.push(QueryParam::String(tag.clone()));
        }

        // One bound pattern, referenced three times.
        if let Some(search) = &self.filter.search {
            param_idx += 1;
            clauses.push(format!(
                "(n.title ILIKE ${idx} ESCAPE '\\' \
                 OR n.content ILIKE ${idx} ESCAPE '\\' \
                 OR EXISTS (SELECT 1 FROM unnest(n.tags) AS st(tag) WHERE st.tag ILIKE ${idx} ESCAPE '\\'))",
                idx = param_idx
            ));
            params.push(QueryParam::String(format!("%{}%", escape_like(search))));
        }

        (clauses.join(" AND "), params)
    }
}
