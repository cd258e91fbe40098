use std::sync::Arc;
use std::thread;

use diesel::sqlite::SqliteConnection;
use log::error;
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::{DatabaseError, Error, Result};

type WriteJob = Box<dyn FnOnce(&mut SqliteConnection) + Send + 'static>;

/// Handle to the single-writer actor.
///
/// SQLite allows one writer at a time; funnelling every write through one
/// dedicated thread serializes them without busy-loops on the pool. Closures
/// run with exclusive access to the writer connection.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::UnboundedSender<WriteJob>,
}

impl WriteHandle {
    pub fn spawn(pool: Arc<DbPool>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<WriteJob>();

        thread::Builder::new()
            .name("db-writer".to_string())
            .spawn(move || {
                let mut conn = match pool.get() {
                    Ok(conn) => conn,
                    Err(e) => {
                        error!("db-writer failed to acquire a connection: {}", e);
                        return;
                    }
                };
                while let Some(job) = rx.blocking_recv() {
                    job(&mut conn);
                }
            })
            .expect("failed to spawn db-writer thread");

        Self { tx }
    }

    /// Runs a closure on the writer connection and awaits its result.
    pub async fn exec<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();

        let job: WriteJob = Box::new(move |conn| {
            let _ = done_tx.send(f(conn));
        });

        self.tx.send(job).map_err(|_| {
            Error::Database(DatabaseError::WriteActorUnavailable(
                "writer thread has stopped".to_string(),
            ))
        })?;

        done_rx.await.map_err(|_| {
            Error::Database(DatabaseError::WriteActorUnavailable(
                "writer dropped the result channel".to_string(),
            ))
        })?
    }
}
