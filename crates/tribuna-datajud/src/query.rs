// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search-kind to query-document mapping.
//!
//! The upstream speaks an Elasticsearch query DSL; each [`SearchKind`] maps
//! to one clause shape. The mapping is pure data construction and fully unit
//! tested here; the client never inspects the document it sends.

use serde_json::{Value, json};
use tribuna_core::{SearchKind, SearchRequest};

/// Fixed number of hit records per page.
pub(crate) const PAGE_SIZE: u32 = 20;

/// Builds the full request body: the kind-specific clause plus paging.
///
/// An explicit page N greater than 1 adds `from = (N - 1) * 20`; page 1 and
/// an absent page are the same request.
pub(crate) fn build_search_body(request: &SearchRequest) -> Value {
    let mut body = json!({
        "query": query_clause(request.kind, &request.query_text),
        "size": PAGE_SIZE,
    });
    if let Some(page) = request.page
        && page > 1
    {
        body["from"] = json!((u64::from(page) - 1) * u64::from(PAGE_SIZE));
    }
    body
}

fn query_clause(kind: SearchKind, query_text: &str) -> Value {
    match kind {
        // Process numbers arrive formatted (0001234-56.2024.8.13.0001) or
        // bare; the index stores digits only, so an exact match needs the
        // punctuation stripped.
        SearchKind::Numero => json!({
            "match": { "numeroProcesso": digits_only(query_text) }
        }),
        SearchKind::Parte => json!({
            "multi_match": {
                "query": query_text,
                "fields": ["partes.nome", "partes.advogados.nome", "partes.advogados.inscricao"]
            }
        }),
        SearchKind::Classe => json!({
            "match": { "classe.codigo": query_text }
        }),
        SearchKind::Avancada => json!({
            "query_string": { "query": query_text }
        }),
    }
}

fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind: SearchKind, query_text: &str, page: Option<u32>) -> SearchRequest {
        SearchRequest {
            tribunal_code: "tjmg".into(),
            kind,
            query_text: query_text.into(),
            related_client_id: None,
            page,
        }
    }

    #[test]
    fn numero_strips_formatting_to_digits() {
        let body = build_search_body(&request(
            SearchKind::Numero,
            "0001234-56.2024.8.13.0001",
            None,
        ));

        assert_eq!(
            body["query"],
            json!({ "match": { "numeroProcesso": "00012345620248130001" } })
        );
    }

    #[test]
    fn numero_keeps_bare_digits_unchanged() {
        let body = build_search_body(&request(SearchKind::Numero, "00012345620248130001", None));
        assert_eq!(body["query"]["match"]["numeroProcesso"], "00012345620248130001");
    }

    #[test]
    fn parte_searches_party_and_counsel_fields() {
        let body = build_search_body(&request(SearchKind::Parte, "Maria Silva", None));

        assert_eq!(body["query"]["multi_match"]["query"], "Maria Silva");
        assert_eq!(
            body["query"]["multi_match"]["fields"],
            json!(["partes.nome", "partes.advogados.nome", "partes.advogados.inscricao"])
        );
    }

    #[test]
    fn classe_matches_class_code() {
        let body = build_search_body(&request(SearchKind::Classe, "7", None));
        assert_eq!(body["query"], json!({ "match": { "classe.codigo": "7" } }));
    }

    #[test]
    fn avancada_passes_query_string_through() {
        let body = build_search_body(&request(
            SearchKind::Avancada,
            "classe.codigo:7 AND orgaoJulgador.nome:vara",
            None,
        ));
        assert_eq!(
            body["query"]["query_string"]["query"],
            "classe.codigo:7 AND orgaoJulgador.nome:vara"
        );
    }

    #[test]
    fn first_page_has_no_offset() {
        let implicit = build_search_body(&request(SearchKind::Classe, "7", None));
        let explicit = build_search_body(&request(SearchKind::Classe, "7", Some(1)));

        assert_eq!(implicit.get("from"), None);
        assert_eq!(explicit.get("from"), None);
        assert_eq!(implicit["size"], 20);
    }

    #[test]
    fn later_pages_offset_by_page_size() {
        let body = build_search_body(&request(SearchKind::Classe, "7", Some(3)));
        assert_eq!(body["from"], 40);
        assert_eq!(body["size"], 20);
    }
}
