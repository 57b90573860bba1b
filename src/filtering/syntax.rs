/// Optional dependency-parser capability for the thought validator
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyntaxError {
    #[error("Parser unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to parse sentence: {0}")]
    ParseFailed(String),
}

/// Dependency relation of a token to its head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyRelation {
    NominalSubject,
    PassiveNominalSubject,
    ClausalSubject,
    DirectObject,
    IndirectObject,
    PrepositionalObject,
    Root,
    Other,
}

impl DependencyRelation {
    /// Map a Universal/Stanford dependency label (`nsubj`, `dobj`, ...)
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "nsubj" => DependencyRelation::NominalSubject,
            "nsubjpass" | "nsubj:pass" => DependencyRelation::PassiveNominalSubject,
            "csubj" | "csubjpass" | "csubj:pass" => DependencyRelation::ClausalSubject,
            "dobj" | "obj" => DependencyRelation::DirectObject,
            "iobj" => DependencyRelation::IndirectObject,
            "pobj" | "obl" => DependencyRelation::PrepositionalObject,
            "root" => DependencyRelation::Root,
            _ => DependencyRelation::Other,
        }
    }

    pub fn is_subject(&self) -> bool {
        matches!(
            self,
            DependencyRelation::NominalSubject
                | DependencyRelation::PassiveNominalSubject
                | DependencyRelation::ClausalSubject
        )
    }

    pub fn is_object(&self) -> bool {
        matches!(
            self,
            DependencyRelation::DirectObject
                | DependencyRelation::IndirectObject
                | DependencyRelation::PrepositionalObject
        )
    }
}

/// One parsed token
#[derive(Debug, Clone)]
pub struct ParsedToken {
    pub text: String,
    pub relation: DependencyRelation,
    /// Part-of-speech tag is VERB (or AUX)
    pub is_verb: bool,
}

/// Subject/verb/object presence derived from a parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseParts {
    pub has_subject: bool,
    pub has_verb: bool,
    pub has_object: bool,
}

impl ClauseParts {
    pub fn from_tokens(tokens: &[ParsedToken]) -> Self {
        Self {
            has_subject: tokens.iter().any(|t| t.relation.is_subject()),
            has_verb: tokens.iter().any(|t| t.is_verb),
            has_object: tokens.iter().any(|t| t.relation.is_object()),
        }
    }
}

/// Trait for dependency parsers
pub trait SyntaxParser: Send + Sync {
    fn parse(&self, sentence: &str) -> Result<Vec<ParsedToken>, SyntaxError>;
}
