use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::SkillResult;

/// Named background tasks, and fire-and-forget deferred calls.
#[derive(Clone, Debug, Default)]
pub struct TaskManager {
    tasks: Arc<Mutex<HashMap<String, JoinHandle<()>>>>,
}

impl TaskManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `fut` as task `name`, unless a task by that name is still
    /// running. Returns whether the task was started.
    pub async fn spawn_named<F>(&self, name: &str, fut: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().await;
        if tasks.get(name).is_some_and(|task| !task.is_finished()) {
            log::debug!("Task [{name}] already running");
            return false;
        }

        log::debug!("Starting task [{name}]");
        tasks.insert(name.to_string(), tokio::spawn(fut));
        true
    }

    pub async fn is_alive(&self, name: &str) -> bool {
        self.tasks
            .lock()
            .await
            .get(name)
            .is_some_and(|task| !task.is_finished())
    }

    /// Wait for task `name` to complete. Returns immediately if no such task
    /// exists.
    pub async fn join(&self, name: &str) -> SkillResult<()> {
        let task = self.tasks.lock().await.remove(name);
        if let Some(task) = task {
            task.await?;
        }
        Ok(())
    }

    /// Run `fut` once, after `delay`
    pub fn do_later<F>(&self, delay: Duration, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fut.await;
        })
    }

    pub async fn shutdown(&self) {
        for (name, task) in self.tasks.lock().await.drain() {
            if !task.is_finished() {
                log::debug!("Stopping task [{name}]");
                task.abort();
            }
        }
    }
}
