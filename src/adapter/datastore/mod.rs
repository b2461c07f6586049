mod doc_db;
mod in_mem;

use std::boxed::Box;
use std::sync::Arc;

use crate::config::AppDataStoreCfg;
use crate::confidentiality::AbstractConfidentiality;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};

pub use doc_db::{run_with_deadline, AppDocDbStore};
pub use in_mem::{AbstInMemoryDStore, AppInMemDstoreLock, AppInMemTableContent, AppInMemoryDStore};

pub(crate) fn build_context(
    logctx: Arc<AppLogContext>,
    cfg: &Vec<AppDataStoreCfg>,
    confidential: Arc<Box<dyn AbstractConfidentiality>>,
) -> (
    Option<Box<dyn AbstInMemoryDStore>>,
    Option<Vec<AppDocDbStore>>,
) {
    let mut inmem = None;
    let mut docdb = None;
    for c in cfg {
        match c {
            AppDataStoreCfg::InMemory(d) => {
                let item: Box<dyn AbstInMemoryDStore> = Box::new(AppInMemoryDStore::new(d));
                inmem = Some(item);
            }
            AppDataStoreCfg::DocDbServer(d) => {
                if docdb.is_none() {
                    docdb = Some(Vec::new());
                }
                if let Some(lst) = &mut docdb {
                    match AppDocDbStore::try_build(d, confidential.clone()) {
                        Ok(item) => {
                            lst.push(item);
                        }
                        Err(e) => {
                            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
                        }
                    }
                }
            }
        }
    }
    (inmem, docdb)
}
