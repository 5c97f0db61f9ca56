// User profile: applicant details, resume text, sender address and the
// sealed mail password. The envelope is stored as-is; it is only ever
// decrypted by the /send handler.

pub mod handlers;
pub mod store;
