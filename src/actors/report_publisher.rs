use crate::{products::check_result::Report, products::unexpected::PublishError, publisher, *};
use actix::prelude::*;
use std::path::PathBuf;


/// ReportPublisher actor stores check results to the status report file
#[derive(Debug, Copy, Clone)]
pub struct ReportPublisher;


/// Report with its destination
#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<(), PublishError>")]
pub struct Publish {
    /// Results of the run
    pub report: Report,

    /// Status report file
    pub destination: PathBuf,
}


impl Handler<Publish> for ReportPublisher {
    type Result = Result<(), PublishError>;

    fn handle(&mut self, message: Publish, _ctx: &mut Self::Context) -> Self::Result {
        debug!("Storing check results to file: {:?}", message.destination);
        publisher::publish(&message.report, &message.destination)
    }
}


impl Actor for ReportPublisher {
    type Context = SyncContext<Self>;
}
