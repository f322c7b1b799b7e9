pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

pub const SCHEMA_VERSION: &str = "1";

/// Splits a schema script into executable statements. Semicolons inside
/// quoted strings or identifiers do not terminate a statement; `--` comment
/// lines are dropped.
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_single = false;
    let mut in_double = false;

    for line in sql.lines() {
        if !in_single && !in_double && line.trim_start().starts_with("--") {
            continue;
        }

        for ch in line.chars() {
            match ch {
                '\'' if !in_double => in_single = !in_single,
                '"' if !in_single => in_double = !in_double,
                ';' if !in_single && !in_double => {
                    let stmt = current.trim();
                    if !stmt.is_empty() {
                        statements.push(stmt.to_string());
                    }
                    current.clear();
                    continue;
                }
                _ => {}
            }
            current.push(ch);
        }
        current.push('\n');
    }

    let tail = current.trim();
    if !tail.is_empty() {
        statements.push(tail.to_string());
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_top_level_semicolons_only() {
        let sql =
            "CREATE TABLE \"a;b\" (x TEXT);\n-- comment; with semicolon\nINSERT INTO t VALUES (';');";
        let stmts = split_statements(sql);
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].contains("a;b"));
        assert!(stmts[1].ends_with("(';')"));
    }

    #[test]
    fn embedded_schema_has_all_tables() {
        let joined = split_statements(SCHEMA_SQL).join("\n");
        for table in ["users", "words", "user_words", "user_stats"] {
            assert!(joined.contains(&format!("\"{table}\"")), "missing {table}");
        }
    }
}
