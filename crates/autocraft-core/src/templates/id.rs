//! Identifiers of the template files the generators read.
//!
//! Each identifier maps to one file in the templates directory. The set is
//! closed: the store loads exactly these files, once.
//!
//! # Examples
//!
//! ```
//! use autocraft_core::templates::TemplateId;
//! use std::str::FromStr;
//!
//! let id = TemplateId::from_str("JDBC_EXEC_BODY_TMPL.j2").unwrap();
//! assert_eq!(id, TemplateId::JdbcExecBody);
//! assert_eq!(id.file_name(), "JDBC_EXEC_BODY_TMPL.j2");
//! assert_eq!(id.to_string(), "JDBC_EXEC_BODY_TMPL.j2");
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::str::FromStr;

/// Known template files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    /// H2 smoke test body running against a container
    H2TestBodyTestcontainers,
    /// H2 smoke test body using an in-memory database
    H2TestBodyInmem,
    /// `main()` body of the JDBC example program
    JdbcExecBody,
    /// Embedded MongoDB CRUD test body
    MongoEmbedBody,
    /// Testcontainers SQL Server connectivity test body
    TestcontainersSqlServerBody,
    /// Kafka `MockProducer` test body
    KafkaMockBody,
    /// JavaFaker example body
    FakerBody,
    /// Mockito test body for the EMS producer
    ProducerTestBody,
    /// Mockito test body for the EMS consumer
    ConsumerTestBody,
}

impl FromStr for TemplateId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .find(|id| id.file_name() == s)
            .ok_or_else(|| format!("Unknown template: {}", s))
    }
}

impl TemplateId {
    /// File name of the template inside the templates directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::H2TestBodyTestcontainers => "H2_TEST_BODY_TESTCONTAINERS.j2",
            Self::H2TestBodyInmem => "H2_TEST_BODY_INMEM.j2",
            Self::JdbcExecBody => "JDBC_EXEC_BODY_TMPL.j2",
            Self::MongoEmbedBody => "MONGO_EMBED_BODY.j2",
            Self::TestcontainersSqlServerBody => "TESTCONTAINERS_SQLSERVER_BODY.j2",
            Self::KafkaMockBody => "KAFKA_MOCK_BODY.j2",
            Self::FakerBody => "FAKER_BODY_TMPL.j2",
            Self::ProducerTestBody => "PRODUCER_TEST_BODY.j2",
            Self::ConsumerTestBody => "CONSUMER_TEST_BODY.j2",
        }
    }

    /// Returns an iterator over all template identifiers
    pub fn all() -> impl Iterator<Item = Self> {
        use TemplateId::*;
        [
            H2TestBodyTestcontainers,
            H2TestBodyInmem,
            JdbcExecBody,
            MongoEmbedBody,
            TestcontainersSqlServerBody,
            KafkaMockBody,
            FakerBody,
            ProducerTestBody,
            ConsumerTestBody,
        ]
        .iter()
        .copied()
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}
