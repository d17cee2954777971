//! Candidate directory interface.
//!
//! The engine never owns user data: it asks an injected [`CandidateDirectory`] for candidates
//! and filters the answer with a [`CandidateMatcher`](crate::CandidateMatcher). One adapter is
//! shared by every field that supports mentions.

use crate::candidate::Candidate;
use crate::error::DirectoryError;

/// A read-only source of mentionable entities.
///
/// Implementations may return a superset of what matches `query` (or even the whole
/// directory); the matcher performs the final filtering and paging.
pub trait CandidateDirectory {
    /// Look up candidates for a free-text query.
    fn search(&self, query: &str) -> Result<Vec<Candidate>, DirectoryError>;
}

impl<F> CandidateDirectory for F
where
    F: Fn(&str) -> Result<Vec<Candidate>, DirectoryError>,
{
    fn search(&self, query: &str) -> Result<Vec<Candidate>, DirectoryError> {
        self(query)
    }
}

/// An in-memory directory that keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticDirectory {
    candidates: Vec<Candidate>,
}

impl StaticDirectory {
    /// Create a directory from a list of candidates.
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// Parse a JSON array of candidates (camelCase keys).
    pub fn from_json_str(json: &str) -> Result<Self, DirectoryError> {
        let candidates: Vec<Candidate> =
            serde_json::from_str(json).map_err(|e| DirectoryError::InvalidData(e.to_string()))?;
        Ok(Self::new(candidates))
    }

    /// Append a candidate.
    pub fn push(&mut self, candidate: Candidate) {
        self.candidates.push(candidate);
    }

    /// All candidates in insertion order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Find a candidate by id.
    pub fn get(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns `true` if the directory has no candidates.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl CandidateDirectory for StaticDirectory {
    fn search(&self, _query: &str) -> Result<Vec<Candidate>, DirectoryError> {
        Ok(self.candidates.clone())
    }
}

impl FromIterator<Candidate> for StaticDirectory {
    fn from_iter<T: IntoIterator<Item = Candidate>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
