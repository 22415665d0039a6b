// Concurrent appends must never interleave records

use std::collections::HashSet;
use std::sync::Arc;
use tasks_service::core::models::Task;
use tasks_service::store::TaskLog;
use tempfile::TempDir;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_are_all_recoverable() {
    const WRITERS: usize = 64;

    let dir = TempDir::new().unwrap();
    let log = Arc::new(TaskLog::new(dir.path().join("tasks.txt")));

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let log = log.clone();
            tokio::spawn(async move {
                let task = Task::new(format!("task-{}", i), "x".repeat(512 + i));
                log.append(&task).await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let tasks = log.read_all().await.unwrap();
    assert_eq!(tasks.len(), WRITERS);

    let titles: HashSet<_> = tasks.iter().map(|t| t.title.clone()).collect();
    assert_eq!(titles.len(), WRITERS);
    for task in &tasks {
        let i: usize = task.title.trim_start_matches("task-").parse().unwrap();
        assert_eq!(task.text.len(), 512 + i);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reads_during_writes_see_whole_records() {
    let dir = TempDir::new().unwrap();
    let log = Arc::new(TaskLog::new(dir.path().join("tasks.txt")));

    let writer = {
        let log = log.clone();
        tokio::spawn(async move {
            for i in 0..32 {
                log.append(&Task::new(format!("w{}", i), "body")).await.unwrap();
            }
        })
    };

    let mut last_len = 0;
    for _ in 0..32 {
        let tasks = log.read_all().await.unwrap();
        assert!(tasks.len() >= last_len);
        last_len = tasks.len();
    }

    writer.await.unwrap();
    assert_eq!(log.read_all().await.unwrap().len(), 32);
}
