use sqlx::PgPool;

use crate::error::ExtractError;

pub async fn list_tables(pool: &PgPool) -> Result<Vec<String>, ExtractError> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        select tablename::text
        from pg_catalog.pg_tables
        where schemaname not in ('pg_catalog', 'information_schema')
        order by tablename
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(names)
}

pub async fn list_columns(pool: &PgPool, table: &str) -> Result<Vec<String>, ExtractError> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        select column_name::text
        from information_schema.columns
        where table_name = $1
          and table_schema not in ('pg_catalog', 'information_schema')
        order by ordinal_position
        "#,
    )
    .bind(table)
    .fetch_all(pool)
    .await?;
    Ok(names)
}

pub async fn fetch_rows_as_json(pool: &PgPool, table: &str) -> Result<Vec<String>, ExtractError> {
    let sql = format!("select row_to_json(t)::text from {} t", quote_ident(table));
    let rows = sqlx::query_scalar::<_, String>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("legacy_users"), "\"legacy_users\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
