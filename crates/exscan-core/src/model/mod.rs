pub mod assembly;
pub mod doc_id;
pub mod record;

pub use assembly::{Assembly, Member};
pub use doc_id::{DocId, MemberKind};
pub use record::MemberRecord;
