//! Query execution paths and result conversion.

use coursa_config::SearchFallback;
use tantivy::{
    TantivyDocument,
    collector::TopDocs,
    query::{AllQuery, BooleanQuery, ConstScoreQuery, Occur, Query, QueryParser, QueryParserError},
    schema::{Field, Value},
};
use tracing::{debug, warn};

use super::{
    Searcher,
    params::{SearchRequest, TextField},
    types::{SearchHit, SearchPage},
};
use crate::{IndexError, document::from_tantivy_date, query::Filter};

/// Score assigned to filter-only and fallback matches.
const CONSTANT_SCORE: f32 = 1.0;

impl Searcher {
    /// Returns one page of hits ordered by the request's sort order.
    ///
    /// Every match is collected before ordering, so `total` counts all pages.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchPage, IndexError> {
        let page = request.effective_page();
        let per_page = request.effective_per_page();

        let mut hits = self.collect(&request.text, &request.fields, request.filter.clone(), None)?;
        request.order.sort(&mut hits);

        let total = hits.len();
        let hits = hits
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        Ok(SearchPage {
            hits,
            total,
            page,
            per_page,
        })
    }

    /// Returns the `limit` most relevant hits for `text`.
    ///
    /// `fields` selects the text fields to match; empty means all of them.
    pub fn search_ranked(
        &self,
        text: &str,
        fields: &[TextField],
        filter: Option<Filter>,
        limit: usize,
    ) -> Result<Vec<SearchHit>, IndexError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.collect(text, fields, filter, Some(limit))
    }

    /// Runs the text and filter, returning hits in relevance order.
    fn collect(
        &self,
        text: &str,
        fields: &[TextField],
        filter: Option<Filter>,
        limit: Option<usize>,
    ) -> Result<Vec<SearchHit>, IndexError> {
        let filter = filter.and_then(Filter::sanitize);
        let text = text.trim();

        if text.is_empty() && filter.is_none() {
            return Ok(Vec::new());
        }

        let reader = self.index.reader().map_err(|e| IndexError::search(&e))?;
        let searcher = reader.searcher();
        let num_docs = usize::try_from(searcher.num_docs()).unwrap_or(usize::MAX);
        if num_docs == 0 {
            return Ok(Vec::new());
        }
        let limit = limit.unwrap_or(num_docs).min(num_docs).max(1);

        let filter_query = filter.as_ref().map(|f| f.compile(&self.schema));

        let query: Box<dyn Query> = if text.is_empty() {
            match filter_query {
                Some(q) => Box::new(ConstScoreQuery::new(q, CONSTANT_SCORE)),
                None => return Ok(Vec::new()),
            }
        } else {
            match self.parse_text(text, fields) {
                Ok(text_query) => match filter_query {
                    Some(q) => Box::new(BooleanQuery::new(vec![
                        (Occur::Must, text_query),
                        (Occur::Must, Box::new(ConstScoreQuery::new(q, 0.0))),
                    ])),
                    None => text_query,
                },
                Err(e) => {
                    warn!(query = text, error = %e, fallback = %self.fallback, "query could not be parsed");
                    return match self.fallback {
                        SearchFallback::Substring => {
                            self.substring_hits(&searcher, text, filter_query, num_docs, limit)
                        }
                        SearchFallback::Empty => Ok(Vec::new()),
                    };
                }
            }
        };

        let top_docs = searcher
            .search(&*query, &TopDocs::with_limit(limit))
            .map_err(|e| IndexError::search(&e))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address).map_err(|e| IndexError::search(&e))?;
            hits.push(self.to_hit(&doc, score));
        }
        debug!(query = text, hits = hits.len(), "search complete");
        Ok(hits)
    }

    /// Parses free text into a weighted OR query across the selected fields.
    fn parse_text(
        &self,
        text: &str,
        fields: &[TextField],
    ) -> Result<Box<dyn Query>, QueryParserError> {
        let selected = if fields.is_empty() {
            &TextField::ALL[..]
        } else {
            fields
        };
        let weighted: Vec<(Field, f32)> = selected
            .iter()
            .map(|f| self.field_and_weight(*f))
            .collect();

        let mut parser =
            QueryParser::for_index(&self.index, weighted.iter().map(|(f, _)| *f).collect());
        for (field, weight) in weighted {
            parser.set_field_boost(field, weight);
        }
        parser.parse_query(text)
    }

    /// Matches every filtered document whose title or description contains all
    /// the bare words of `text`, ignoring case.
    fn substring_hits(
        &self,
        searcher: &tantivy::Searcher,
        text: &str,
        filter_query: Option<Box<dyn Query>>,
        num_docs: usize,
        limit: usize,
    ) -> Result<Vec<SearchHit>, IndexError> {
        let needles = fallback_terms(text);
        if needles.is_empty() {
            return Ok(Vec::new());
        }

        let base = filter_query.unwrap_or_else(|| Box::new(AllQuery));
        let candidates = searcher
            .search(&*base, &TopDocs::with_limit(num_docs))
            .map_err(|e| IndexError::search(&e))?;

        let mut hits = Vec::new();
        for (_, address) in candidates {
            let doc: TantivyDocument = searcher.doc(address).map_err(|e| IndexError::search(&e))?;
            let hit = self.to_hit(&doc, CONSTANT_SCORE);
            let haystack = format!("{} {}", hit.title, hit.description).to_lowercase();
            if needles.iter().all(|n| haystack.contains(n.as_str())) {
                hits.push(hit);
                if hits.len() >= limit {
                    break;
                }
            }
        }
        debug!(query = text, hits = hits.len(), "substring fallback complete");
        Ok(hits)
    }

    /// Converts a stored document into a hit.
    fn to_hit(&self, doc: &TantivyDocument, score: f32) -> SearchHit {
        let text = |field: Field| {
            doc.get_first(field)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        let number = |field: Field| doc.get_first(field).and_then(|v| v.as_f64());

        SearchHit {
            url: text(self.schema.url),
            title: text(self.schema.title),
            description: text(self.schema.description),
            keywords: text(self.schema.keywords)
                .split(',')
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
            score,
            rating: number(self.schema.rating),
            duration: number(self.schema.duration),
            last_scraped: doc
                .get_first(self.schema.last_scraped)
                .and_then(|v| v.as_datetime())
                .and_then(from_tantivy_date),
        }
    }
}

/// Extracts bare lowercase words from query text, dropping field prefixes and
/// surrounding punctuation.
fn fallback_terms(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|token| token.rsplit(':').next().unwrap_or(token))
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod test {
    use super::fallback_terms;

    #[test]
    fn fallback_strips_field_prefixes() {
        assert_eq!(fallback_terms("nosuchfield:python"), vec!["python"]);
        assert_eq!(
            fallback_terms("\"Deep (Learning\" AND"),
            vec!["deep", "learning", "and"]
        );
        assert!(fallback_terms(" :: ").is_empty());
    }
}
