use crate::schema::{PrimaryKey, TableSchema};

/// Quote an identifier. `end` is a keyword, so every identifier is quoted.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Generate CREATE TABLE IF NOT EXISTS SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", quote_ident(schema.name));
    let mut columns = Vec::new();

    if let PrimaryKey::Surrogate(key) = schema.primary_key {
        columns.push(format!(
            "    {} INTEGER PRIMARY KEY AUTOINCREMENT",
            quote_ident(key)
        ));
    }

    for col in schema.columns {
        let pk = if schema.primary_key == PrimaryKey::Natural(col.name) {
            " PRIMARY KEY"
        } else {
            ""
        };
        let null_constraint = if !col.nullable { " NOT NULL" } else { "" };

        columns.push(format!(
            "    {} {}{}{}",
            quote_ident(col.name),
            col.col_type.sql_type(),
            pk,
            null_constraint
        ));
    }

    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            quote_ident(fk.column),
            quote_ident(fk.references_table),
            quote_ident(fk.references_column)
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX IF NOT EXISTS statements for foreign key columns
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    schema
        .foreign_keys
        .iter()
        .map(|fk| {
            format!(
                "CREATE INDEX IF NOT EXISTS {} ON {}({})",
                quote_ident(&format!("idx_{}_{}", schema.name, fk.column)),
                quote_ident(schema.name),
                quote_ident(fk.column)
            )
        })
        .collect()
}

/// Generate a positional INSERT covering every stored column
pub fn generate_insert(schema: &TableSchema) -> String {
    let columns = schema.column_names();
    let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(schema.name),
        quoted_list(&columns),
        placeholders.join(", ")
    )
}

/// Generate a SELECT of every stored column
pub fn generate_select(schema: &TableSchema) -> String {
    format!(
        "SELECT {} FROM {}",
        quoted_list(&schema.column_names()),
        quote_ident(schema.name)
    )
}

pub fn quoted_list(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ")
}
