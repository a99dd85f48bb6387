//! Friendly read-only views over raw legacy records.
//!
//! A [`folio_core::record::LegacyRecord`] is a positional, multi-occurrence
//! tagged-field structure; the views in this crate layer named domain
//! accessors on top of it for the three migratable entity kinds. Pure and
//! synchronous; no storage or async dependencies.
//!
//! Segment positions are semantically fixed per entity kind:
//! journals and issues use a single segment; a document uses segment 0 for
//! header/dates, segment 1 for raw metadata and segment 2 for formatted
//! (rich) metadata.

pub mod contrib;
pub mod document;
pub mod issue;
pub mod journal;

mod issn;

pub use contrib::{Contributor, XrefKind, classify_xref, parse_xrefs};
pub use document::DocumentView;
pub use issn::IssnSet;
pub use issue::IssueView;
pub use journal::JournalView;

/// Strip leading zeros from a numeric label part; non-numeric parts pass
/// through unchanged.
pub(crate) fn remove_leading_zeros(part: &str) -> String {
  match part.parse::<u64>() {
    Ok(n) => n.to_string(),
    Err(_) => part.to_string(),
  }
}

#[cfg(test)]
pub(crate) mod test_records {
  //! Shared record fixtures for the view tests.

  use folio_core::record::{LegacyRecord, Occurrence, RecordSegment};

  pub fn journal_record() -> LegacyRecord {
    let mut seg = RecordSegment::new();
    seg.push_scalar("v100", "Revista de Testes");
    seg.push_scalar("v151", "Rev. Test.");
    seg.push_scalar("v150", "Rev. Testes");
    seg.push_scalar("v068", "RDT");
    seg.push(
      "v435",
      Occurrence::from([("t", "PRINT"), ("_", "0001-0001")]),
    );
    seg.push(
      "v435",
      Occurrence::from([("t", "ONLIN"), ("_", "1234-5678")]),
    );
    seg.push_scalar("v480", "Sociedade de Testes");
    seg.push_scalar("v480", "Editora X");
    seg.push_scalar("v490", "São Paulo");
    seg.push_scalar("v320", "SP");
    seg.push_scalar("v940", "19990101");
    seg.push_scalar("v941", "20200102");
    LegacyRecord::new("0001-0001", vec![seg])
  }

  pub fn issue_record() -> LegacyRecord {
    let mut seg = RecordSegment::new();
    seg.push_scalar("v035", "0001-0001");
    seg.push_scalar("v031", "05");
    seg.push_scalar("v032", "2");
    seg.push_scalar("v930", "RDT");
    seg.push_scalar("v065", "20200400");
    seg.push_scalar("v036", "20202");
    seg.push_scalar("v042", "1");
    seg.push(
      "v049",
      Occurrence::from([("c", "sec01"), ("l", "en"), ("t", "Articles")]),
    );
    seg.push(
      "v049",
      Occurrence::from([("c", "sec01"), ("l", "pt"), ("t", "Artigos")]),
    );
    seg.push_scalar("v940", "20200401");
    seg.push_scalar("v941", "20200402");
    LegacyRecord::new("0001-000120200002", vec![seg])
  }

  pub fn document_record() -> LegacyRecord {
    let mut header = RecordSegment::new();
    header.push_scalar("v091", "20200301123000");
    header.push_scalar("v093", "20200101090000");

    let mut raw = RecordSegment::new();
    raw.push_scalar("v002", "S0001-0001(20)00200015");
    raw.push_scalar("v880", "S0001-00012020000200015");
    raw.push_scalar("v885", "pidv3xyz");
    raw.push_scalar("v237", "10.1000/test.2020.15");
    raw.push_scalar("v040", "en");
    raw.push_scalar("v071", "oa");
    raw.push_scalar("v121", "00015");
    raw.push_scalar("v049", "sec01");
    raw.push_scalar("v702", "xml/rdt/v5n2/a01.xml");
    raw.push_scalar("v065", "20200400");
    raw.push_scalar("v223", "20200415");
    raw.push_scalar("v601", "pt");
    raw.push("v014", Occurrence::from([("f", "10"), ("l", "25")]));
    raw.push(
      "v010",
      Occurrence::from([("s", "Silva"), ("n", "Ana"), ("r", "ND"), ("1", "a01")]),
    );
    raw.push(
      "v010",
      Occurrence::from([("s", "Souza"), ("n", "Bento"), ("r", "ND")]),
    );
    raw.push("v085", Occurrence::from([("l", "en"), ("k", "testing")]));
    raw.push("v085", Occurrence::from([("l", "en"), ("k", "migration")]));
    raw.push("v085", Occurrence::from([("l", "pt"), ("k", "testes")]));

    let mut formatted = RecordSegment::new();
    formatted.push(
      "v012",
      Occurrence::from([("l", "en"), ("_", "A study of tests")]),
    );
    formatted.push(
      "v012",
      Occurrence::from([("l", "pt"), ("_", "Um estudo")]),
    );
    formatted.push(
      "v083",
      Occurrence::from([("l", "en"), ("_", "We study tests.")]),
    );

    LegacyRecord::new(
      "S0001-00012020000200015",
      vec![header, raw, formatted],
    )
  }
}
