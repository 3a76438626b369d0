use clipbot_common::models::{Clip, ClipQuery};

/// A single check of a candidate clip against the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchPredicate {
    /// Query title is a case-insensitive substring of the clip title.
    Title,
    /// Query creator is a case-insensitive substring of the clip creator name.
    Creator,
}

impl MatchPredicate {
    pub fn matches(self, clip: &Clip, query: &ClipQuery) -> bool {
        match self {
            MatchPredicate::Title => title_matches(clip, query),
            MatchPredicate::Creator => creator_matches(clip, query),
        }
    }
}

/// An empty query title matches every clip.
pub fn title_matches(clip: &Clip, query: &ClipQuery) -> bool {
    contains_ignore_case(&clip.title, &query.title)
}

/// An empty query creator matches every clip.
pub fn creator_matches(clip: &Clip, query: &ClipQuery) -> bool {
    contains_ignore_case(&clip.creator_name, &query.creator_name)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Logical AND over an ordered list of predicates. An empty list matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matcher {
    predicates: Vec<MatchPredicate>,
}

impl Matcher {
    pub fn new(predicates: Vec<MatchPredicate>) -> Self {
        Self { predicates }
    }

    /// Title and creator, the filters every `!clips` lookup applies.
    pub fn title_and_creator() -> Self {
        Self::new(vec![MatchPredicate::Title, MatchPredicate::Creator])
    }

    pub fn and(mut self, predicate: MatchPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[MatchPredicate] {
        &self.predicates
    }

    pub fn matches(&self, clip: &Clip, query: &ClipQuery) -> bool {
        self.predicates.iter().all(|p| p.matches(clip, query))
    }
}
