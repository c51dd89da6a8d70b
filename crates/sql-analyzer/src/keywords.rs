use lazy_static::lazy_static;
use std::collections::HashSet;

/// Keywords reported as dangerous, in reporting order.
pub const DANGEROUS_KEYWORDS: [&str; 7] =
    ["DROP", "TRUNCATE", "DELETE", "ALTER", "CREATE", "GRANT", "REVOKE"];

/// Prefixes of join clauses (`LEFT JOIN`, `LEFT OUTER JOIN`, ...).
pub const JOIN_MODIFIERS: [&str; 6] = ["LEFT", "RIGHT", "INNER", "FULL", "CROSS", "NATURAL"];

lazy_static! {
    static ref KEYWORDS: HashSet<&'static str> = build_keywords();
}

fn build_keywords() -> HashSet<&'static str> {
    [
        "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "BETWEEN", "BY", "CASE", "CAST", "CREATE",
        "CROSS", "DEFAULT", "DELETE", "DESC", "DESCRIBE", "DISTINCT", "DROP", "ELSE", "END",
        "EXCEPT", "EXISTS", "EXPLAIN", "FETCH", "FIRST", "FOR", "FROM", "FULL", "GRANT", "GROUP",
        "HAVING", "ILIKE", "IN", "INDEX", "INNER", "INSERT", "INTERSECT", "INTO", "IS", "JOIN",
        "KEY", "LEFT", "LIKE", "LIMIT", "NATURAL", "NEXT", "NOT", "NULL", "OFFSET", "ON", "ONLY",
        "OR", "ORDER", "OUTER", "PRIMARY", "RECURSIVE", "RETURNING", "REVOKE", "RIGHT", "ROWS",
        "SELECT", "SET", "SHOW", "TABLE", "THEN", "TOP", "TRUNCATE", "UNION", "UPDATE", "USING",
        "VALUES", "VIEW", "WHEN", "WHERE", "WITH",
    ]
    .into_iter()
    .collect()
}

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(word.to_ascii_uppercase().as_str())
}
