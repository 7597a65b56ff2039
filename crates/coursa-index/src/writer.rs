//! Index writer for upserting course documents.

use std::{fs, path::Path};

use tantivy::{Index, IndexWriter as TantivyIndexWriter, Term, directory::MmapDirectory};
use tracing::debug;

use crate::{
    analyzer::{COURSE_TOKENIZER, build_analyzer_from_name},
    document::CourseDocument,
    error::IndexError,
    schema::IndexSchema,
};

/// Default heap size for the index writer (50 MB).
const DEFAULT_HEAP_SIZE: usize = 50_000_000;

/// Writes course documents to a Tantivy index.
///
/// Changes are staged until [`commit`](Self::commit); a commit publishes the whole
/// batch at once, so searchers never observe a partially written batch.
pub struct IndexWriter {
    /// The Tantivy index.
    index: Index,
    /// The underlying Tantivy writer.
    writer: TantivyIndexWriter,
    /// Schema with field handles.
    schema: IndexSchema,
}

impl IndexWriter {
    /// Opens or creates an index at the given path.
    pub fn open(path: &Path, language: &str) -> Result<Self, IndexError> {
        let schema = IndexSchema::new();

        fs::create_dir_all(path)?;

        let dir = MmapDirectory::open(path).map_err(|e| {
            let err: tantivy::TantivyError = e.into();
            IndexError::open_index(path.to_path_buf(), &err)
        })?;

        let index = Index::open_or_create(dir, schema.schema().clone())
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;

        let analyzer = build_analyzer_from_name(language)?;
        index.tokenizers().register(COURSE_TOKENIZER, analyzer);

        let writer = index
            .writer(DEFAULT_HEAP_SIZE)
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;

        Ok(Self {
            index,
            writer,
            schema,
        })
    }

    /// Inserts a document, replacing any existing document with the same URL.
    pub fn upsert(&mut self, doc: &CourseDocument) -> Result<(), IndexError> {
        self.delete(&doc.url);
        self.writer
            .add_document(doc.to_tantivy(&self.schema))
            .map_err(|e| IndexError::write(&e))?;
        Ok(())
    }

    /// Upserts multiple documents.
    pub fn upsert_all(&mut self, docs: &[CourseDocument]) -> Result<(), IndexError> {
        for doc in docs {
            self.upsert(doc)?;
        }
        debug!(count = docs.len(), "staged course documents");
        Ok(())
    }

    /// Deletes the document with the given URL.
    pub fn delete(&mut self, url: &str) {
        let term = Term::from_field_text(self.schema.url, url);
        self.writer.delete_term(term);
    }

    /// Commits all pending changes to the index.
    pub fn commit(&mut self) -> Result<(), IndexError> {
        self.writer.commit().map_err(|e| IndexError::commit(&e))?;
        Ok(())
    }

    /// Rolls back any uncommitted changes.
    pub fn rollback(&mut self) -> Result<(), IndexError> {
        self.writer.rollback().map_err(|e| IndexError::commit(&e))?;
        Ok(())
    }

    /// Deletes all documents from the index.
    pub fn delete_all(&mut self) -> Result<(), IndexError> {
        self.writer
            .delete_all_documents()
            .map_err(|e| IndexError::write(&e))?;
        Ok(())
    }

    /// Stages `docs` and commits them as one batch.
    ///
    /// On failure the staged changes are rolled back and the previous commit stays
    /// visible.
    pub fn commit_batch(&mut self, docs: &[CourseDocument]) -> Result<(), IndexError> {
        let staged = self.upsert_all(docs).and_then(|()| self.commit());
        if let Err(err) = staged {
            self.rollback()?;
            return Err(err);
        }
        Ok(())
    }

    /// Replaces the entire index content with `docs` in a single commit.
    pub fn rebuild(&mut self, docs: &[CourseDocument]) -> Result<(), IndexError> {
        let staged = self
            .delete_all()
            .and_then(|()| self.upsert_all(docs))
            .and_then(|()| self.commit());
        if let Err(err) = staged {
            self.rollback()?;
            return Err(err);
        }
        Ok(())
    }

    /// Returns the number of committed documents in the index.
    pub fn num_docs(&self) -> Result<u64, IndexError> {
        let reader = self.index.reader().map_err(|e| IndexError::write(&e))?;
        Ok(reader.searcher().num_docs())
    }
}

#[cfg(test)]
mod test {
    use chrono::DateTime;
    use tempfile::TempDir;

    use super::*;

    fn make_doc(url: &str, title: &str) -> CourseDocument {
        CourseDocument {
            url: url.to_string(),
            title: title.to_string(),
            description: String::new(),
            keywords: vec![],
            category: None,
            level: None,
            platform: None,
            instructor: None,
            duration: None,
            rating: None,
            last_scraped: DateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn creates_index_in_empty_directory() {
        let temp = TempDir::new().unwrap();
        let writer = IndexWriter::open(temp.path(), "english").unwrap();

        assert!(temp.path().join("meta.json").exists());
        drop(writer);
    }

    #[test]
    fn rejects_unknown_language() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            IndexWriter::open(temp.path(), "klingon"),
            Err(IndexError::InvalidLanguage(_))
        ));
    }

    #[test]
    fn upsert_replaces_by_url() {
        let temp = TempDir::new().unwrap();
        let mut writer = IndexWriter::open(temp.path(), "english").unwrap();

        writer.upsert(&make_doc("https://a", "First")).unwrap();
        writer.commit().unwrap();
        writer.upsert(&make_doc("https://a", "First, revised")).unwrap();
        writer.upsert(&make_doc("https://b", "Second")).unwrap();
        writer.commit().unwrap();

        assert_eq!(writer.num_docs().unwrap(), 2);
    }

    #[test]
    fn upsert_twice_in_one_batch_keeps_one() {
        let temp = TempDir::new().unwrap();
        let mut writer = IndexWriter::open(temp.path(), "english").unwrap();

        let doc = make_doc("https://a", "Same");
        writer.commit_batch(&[doc.clone(), doc]).unwrap();

        assert_eq!(writer.num_docs().unwrap(), 1);
    }

    #[test]
    fn uncommitted_changes_are_invisible() {
        let temp = TempDir::new().unwrap();
        let mut writer = IndexWriter::open(temp.path(), "english").unwrap();

        writer.upsert(&make_doc("https://a", "Pending")).unwrap();
        assert_eq!(writer.num_docs().unwrap(), 0);

        writer.rollback().unwrap();
        writer.commit().unwrap();
        assert_eq!(writer.num_docs().unwrap(), 0);
    }

    #[test]
    fn rebuild_replaces_everything() {
        let temp = TempDir::new().unwrap();
        let mut writer = IndexWriter::open(temp.path(), "english").unwrap();

        writer
            .commit_batch(&[make_doc("https://a", "A"), make_doc("https://b", "B")])
            .unwrap();
        writer.rebuild(&[make_doc("https://c", "C")]).unwrap();

        assert_eq!(writer.num_docs().unwrap(), 1);
    }

    #[test]
    fn reopens_existing_index() {
        let temp = TempDir::new().unwrap();
        {
            let mut writer = IndexWriter::open(temp.path(), "english").unwrap();
            writer.commit_batch(&[make_doc("https://a", "A")]).unwrap();
        }
        let writer = IndexWriter::open(temp.path(), "english").unwrap();
        assert_eq!(writer.num_docs().unwrap(), 1);
    }
}
