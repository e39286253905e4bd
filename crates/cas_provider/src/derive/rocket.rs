use rocket::{
    http::{ContentType, Status},
    response::{self, Responder},
    Request, Response,
};

use crate::{protocol::v2, Error};

/// CAS v2 failure body for Error enum
///
/// CAS clients read the failure code from the body, so the status is always 200.
impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        if let Error::DatabaseError { operation, with } = &self {
            error!("Store failure during {} on {}", operation, with);
        }

        let string = v2::authentication_failure(&self);

        Response::build()
            .sized_body(string.len(), std::io::Cursor::new(string))
            .header(ContentType::XML)
            .status(Status::Ok)
            .ok()
    }
}
