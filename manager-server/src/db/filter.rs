//! Filtered, paginated SELECT composition
//!
//! Predicates and their bound values are accumulated together, and each
//! placeholder number is derived from the number of values bound so far.
//! User input only ever reaches the argument list; column names are
//! `&'static str` chosen by the caller.

use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;

pub const DEFAULT_LIMIT: i64 = 5;
pub const DEFAULT_OFFSET: i64 = 0;

/// LIMIT / OFFSET pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl Page {
    /// Parse raw query-string values. Missing, unparsable or out-of-range
    /// values fall back to the defaults independently of each other.
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = limit
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_LIMIT);
        let offset = offset
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v >= 0)
            .unwrap_or(DEFAULT_OFFSET);
        Self { limit, offset }
    }
}

/// A value bound to a positional placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Int(v)
    }
}

/// Escape LIKE metacharacters so user input matches literally
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Builder for `<base> WHERE 1=1 [AND ...] [ORDER BY ...] LIMIT $n OFFSET $n+1`
#[derive(Debug, Clone)]
pub struct FilterQuery {
    base: String,
    conditions: Vec<String>,
    args: Vec<FilterValue>,
    order_by: Option<&'static str>,
}

impl FilterQuery {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            conditions: Vec::new(),
            args: Vec::new(),
            order_by: None,
        }
    }

    /// Bind `value` and return the placeholder that refers to it
    fn bind(&mut self, value: FilterValue) -> String {
        self.args.push(value);
        format!("${}", self.args.len())
    }

    fn push(&mut self, column: &'static str, op: &str, value: FilterValue) -> &mut Self {
        let placeholder = self.bind(value);
        self.conditions.push(format!("{column} {op} {placeholder}"));
        self
    }

    /// `column = value`
    pub fn eq(&mut self, column: &'static str, value: impl Into<FilterValue>) -> &mut Self {
        self.push(column, "=", value.into())
    }

    /// `column = value` when a value is given
    pub fn eq_opt<V: Into<FilterValue>>(
        &mut self,
        column: &'static str,
        value: Option<V>,
    ) -> &mut Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    /// Case-sensitive prefix match
    pub fn starts_with(&mut self, column: &'static str, prefix: Option<&str>) -> &mut Self {
        match prefix {
            Some(p) => self.push(column, "LIKE", FilterValue::Text(format!("{}%", escape_like(p)))),
            None => self,
        }
    }

    /// Case-insensitive substring match
    pub fn contains_ci(&mut self, column: &'static str, needle: Option<&str>) -> &mut Self {
        match needle {
            Some(n) => self.push(
                column,
                "ILIKE",
                FilterValue::Text(format!("%{}%", escape_like(n))),
            ),
            None => self,
        }
    }

    pub fn order_by(&mut self, clause: &'static str) -> &mut Self {
        self.order_by = Some(clause);
        self
    }

    /// Render the statement; pagination is always bound last
    pub fn build(mut self, page: Page) -> (String, Vec<FilterValue>) {
        let mut sql = self.base.trim_end().to_string();
        sql.push_str(" WHERE 1=1");
        for condition in &self.conditions {
            sql.push_str(" AND ");
            sql.push_str(condition);
        }
        if let Some(order) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        let limit = self.bind(FilterValue::Int(page.limit));
        let offset = self.bind(FilterValue::Int(page.offset));
        sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));

        (sql, self.args)
    }
}

/// Bind rendered arguments onto a sqlx query in order
pub fn bind_args<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    args: Vec<FilterValue>,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for arg in args {
        query = match arg {
            FilterValue::Text(s) => query.bind(s),
            FilterValue::Int(i) => query.bind(i),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "SELECT id, name FROM departments";

    fn text(v: &str) -> FilterValue {
        FilterValue::Text(v.to_string())
    }

    #[test]
    fn test_no_filters_only_paginates() {
        let (sql, args) = FilterQuery::new(BASE).build(Page::default());
        assert_eq!(
            sql,
            "SELECT id, name FROM departments WHERE 1=1 LIMIT $1 OFFSET $2"
        );
        assert_eq!(args, vec![FilterValue::Int(5), FilterValue::Int(0)]);
    }

    #[test]
    fn test_single_substring_filter() {
        let mut q = FilterQuery::new(BASE);
        q.contains_ci("name", Some("eng"));
        let (sql, args) = q.build(Page {
            limit: 5,
            offset: 0,
        });

        assert_eq!(
            sql,
            "SELECT id, name FROM departments WHERE 1=1 AND name ILIKE $1 LIMIT $2 OFFSET $3"
        );
        assert_eq!(
            args,
            vec![text("%eng%"), FilterValue::Int(5), FilterValue::Int(0)]
        );
    }

    #[test]
    fn test_all_filters_numbered_in_append_order() {
        let mut q = FilterQuery::new(
            "SELECT e.identity_number FROM employees e JOIN departments d ON d.id = e.department_id",
        );
        q.eq("d.owner_id", 9_i64)
            .starts_with("e.identity_number", Some("XX"))
            .contains_ci("e.name", Some("jo"))
            .eq_opt("e.gender", Some("female"))
            .eq_opt("e.department_id", Some(3_i64))
            .order_by("e.identity_number ASC");
        let (sql, args) = q.build(Page {
            limit: 10,
            offset: 20,
        });

        assert_eq!(
            sql,
            "SELECT e.identity_number FROM employees e JOIN departments d ON d.id = e.department_id \
             WHERE 1=1 AND d.owner_id = $1 AND e.identity_number LIKE $2 AND e.name ILIKE $3 \
             AND e.gender = $4 AND e.department_id = $5 ORDER BY e.identity_number ASC \
             LIMIT $6 OFFSET $7"
        );
        assert_eq!(
            args,
            vec![
                FilterValue::Int(9),
                text("XX%"),
                text("%jo%"),
                text("female"),
                FilterValue::Int(3),
                FilterValue::Int(10),
                FilterValue::Int(20),
            ]
        );
    }

    #[test]
    fn test_placeholders_match_argument_count() {
        // Every subset of filters must produce $1..$n with n == args.len()
        for mask in 0u8..16 {
            let mut q = FilterQuery::new(BASE);
            if mask & 1 != 0 {
                q.eq("a", 1_i64);
            }
            if mask & 2 != 0 {
                q.starts_with("b", Some("x"));
            }
            if mask & 4 != 0 {
                q.contains_ci("c", Some("y"));
            }
            if mask & 8 != 0 {
                q.eq_opt("d", Some("z"));
            }
            let (sql, args) = q.build(Page::default());

            let expected = mask.count_ones() as usize + 2;
            assert_eq!(args.len(), expected, "mask {mask}");

            let placeholders: Vec<&str> = sql
                .split_whitespace()
                .filter(|t| t.starts_with('$'))
                .collect();
            let want: Vec<String> = (1..=expected).map(|n| format!("${n}")).collect();
            assert_eq!(placeholders, want, "mask {mask}");
            assert!(sql.ends_with(&format!("LIMIT ${} OFFSET ${}", expected - 1, expected)));
        }
    }

    #[test]
    fn test_absent_optionals_bind_nothing() {
        let mut q = FilterQuery::new(BASE);
        q.starts_with("b", None)
            .contains_ci("c", None)
            .eq_opt::<i64>("d", None);
        let (_, args) = q.build(Page::default());
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_user_input_never_reaches_sql() {
        let hostile = "x'; DROP TABLE employees; --";
        let mut q = FilterQuery::new(BASE);
        q.contains_ci("name", Some(hostile));
        let (sql, args) = q.build(Page::default());

        assert!(!sql.contains("DROP"));
        assert_eq!(args[0], text(&format!("%{hostile}%")));
    }

    #[test]
    fn test_like_metacharacters_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        let mut q = FilterQuery::new(BASE);
        q.starts_with("identity_number", Some("A_1"));
        let (_, args) = q.build(Page::default());
        assert_eq!(args[0], text("A\\_1%"));
    }

    #[test]
    fn test_page_parse() {
        assert_eq!(Page::parse(None, None), Page::default());
        assert_eq!(
            Page::parse(Some("10"), Some("20")),
            Page {
                limit: 10,
                offset: 20
            }
        );
        assert_eq!(Page::parse(Some("abc"), Some("-1")), Page::default());
        assert_eq!(Page::parse(Some("0"), Some("3")).limit, DEFAULT_LIMIT);
        assert_eq!(Page::parse(Some(""), Some("3")).offset, 3);
    }
}
