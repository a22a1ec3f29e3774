// file: src/database/query.rs
// description: SQL text for the catalog schema (MySQL dialect)
// reference: produits / produits_group / caracteristiques / dictionnaires_langues

use crate::database::source::ExportQuery;
use crate::models::{AttributeSpec, GALLERY_SLOTS};

pub const LIST_TABLES: &str = "SELECT CAST(TABLE_NAME AS CHAR) AS name \
     FROM information_schema.TABLES \
     WHERE TABLE_SCHEMA = DATABASE() \
     ORDER BY TABLE_NAME";

pub const DESCRIBE_TABLE: &str = "SELECT CAST(COLUMN_NAME AS CHAR) AS name, \
     CAST(COLUMN_TYPE AS CHAR) AS data_type, \
     CAST(IS_NULLABLE AS CHAR) AS nullable, \
     CAST(COLUMN_KEY AS CHAR) AS column_key \
     FROM information_schema.COLUMNS \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
     ORDER BY ORDINAL_POSITION";

pub const COUNT_PRODUCTS: &str = "SELECT COUNT(*) AS total FROM produits";

pub const COUNT_PRODUCTS_WITH_EAN: &str = "SELECT COUNT(*) AS total FROM produits \
     WHERE ean IS NOT NULL AND ean != '' AND TRIM(ean) != ''";

pub const COUNT_ACTIVE_PRODUCTS: &str =
    "SELECT COUNT(*) AS total FROM produits WHERE status = 'on'";

/// Backtick-quotes a MySQL identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Escapes `LIKE` wildcards so `fragment` is matched literally, then wraps it in `%`.
pub fn like_contains(fragment: &str) -> String {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Every column of `table`, cast to text so rows decode uniformly.
pub fn select_all_as_text(table: &str, columns: &[String]) -> String {
    let projection = columns
        .iter()
        .map(|column| {
            let quoted = quote_identifier(column);
            format!("CAST({} AS CHAR) AS {}", quoted, quoted)
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("SELECT {} FROM {}", projection, quote_identifier(table))
}

pub fn active_products_page(columns: &[String]) -> String {
    format!(
        "{} WHERE status = 'on' LIMIT ? OFFSET ?",
        select_all_as_text("produits", columns)
    )
}

pub fn sample_products(columns: &[String]) -> String {
    format!("{} LIMIT ?", select_all_as_text("produits", columns))
}

pub fn products_by_ean(columns: &[String]) -> String {
    format!("{} WHERE ean = ?", select_all_as_text("produits", columns))
}

pub fn products_by_partial_ean(columns: &[String]) -> String {
    format!(
        "{} WHERE TRIM(ean) LIKE ?",
        select_all_as_text("produits", columns)
    )
}

/// The comprehensive export join. Placeholders: one per EAN, in order.
pub fn export_rows(query: &ExportQuery) -> String {
    let mut sql = String::from(
        "SELECT \
         CAST(p.idproduit AS SIGNED) AS product_id, \
         CAST(p.ref AS CHAR) AS reference, \
         CAST(p.ean AS CHAR) AS ean, \
         CAST(p.idproduit_group AS SIGNED) AS group_id, \
         CAST(p.keywords AS CHAR) AS keywords, \
         CAST(p.desc_fastmag AS CHAR) AS legacy_description, \
         CAST(p.description_fr AS CHAR) AS product_description, \
         CAST(p.poids AS CHAR) AS weight, \
         CAST(p.cols AS CHAR) AS size_code, \
         CAST(p.virtuel AS CHAR) AS virtual_flag, \
         CAST(p.variant_group_code AS CHAR) AS variant_group_code, \
         CAST(pg.nom_fr AS CHAR) AS group_name, \
         CAST(pg.description_fr AS CHAR) AS group_description, \
         CAST(pm.marque_fr AS CHAR) AS brand_name",
    );

    for slot in 0..GALLERY_SLOTS {
        sql.push_str(&format!(
            ", CAST(g{slot}.idimage AS SIGNED) AS image_{slot}, CAST(g{slot}.ext AS CHAR) AS ext_{slot}"
        ));
    }

    sql.push_str(
        " FROM produits p \
         LEFT JOIN produits_group pg ON p.idproduit_group = pg.idproduit_group \
         LEFT JOIN produits_marque pm ON pg.idmarque = pm.idmarque",
    );

    for slot in 0..GALLERY_SLOTS {
        sql.push_str(&format!(
            " LEFT JOIN produits_gallery g{slot} ON pg.idproduit_group = g{slot}.idproduit_group \
             AND g{slot}.position = {slot} AND g{slot}.status = 'on'"
        ));
    }

    sql.push_str(" WHERE p.status = 'on'");

    if !query.eans.is_empty() {
        let placeholders = vec!["?"; query.eans.len()].join(", ");
        sql.push_str(&format!(" AND p.ean IN ({})", placeholders));
    }

    sql.push_str(" ORDER BY p.idproduit");

    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    sql
}

/// Characteristic values for one group. Returns the SQL and the key patterns
/// to bind after the group id; when `spec.min_len` is set it is bound next,
/// and the row limit last.
pub fn attribute_values(spec: &AttributeSpec) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut patterns = Vec::new();

    for exact in spec.exact {
        conditions.push("dk.valeur = ?");
        patterns.push(exact.to_string());
    }

    for fragment in spec.contains {
        conditions.push("dk.valeur LIKE ?");
        patterns.push(like_contains(fragment));
    }

    let mut sql = format!(
        "SELECT CAST(dv.valeur AS CHAR) AS value \
         FROM produits_group_caracteristiques pgc \
         JOIN caracteristiques c ON pgc.idcaracteristique = c.idcaracteristique \
         JOIN dictionnaires_langues dk ON c.iddictionnaire_cle = dk.iddictionnaire \
         JOIN dictionnaires_langues dv ON c.iddictionnaire_valeur = dv.iddictionnaire \
         WHERE pgc.idproduit_group = ? \
         AND pgc.status = 'on' \
         AND c.status = 'on' \
         AND ({}) \
         AND dv.valeur IS NOT NULL \
         AND dv.valeur != ''",
        conditions.join(" OR ")
    );

    if spec.min_len.is_some() {
        sql.push_str(" AND CHAR_LENGTH(dv.valeur) > ?");
    }

    sql.push_str(" ORDER BY pgc.position LIMIT ?");

    (sql, patterns)
}
