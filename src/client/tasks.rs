use crate::models::{MessageResponse, Status, StatusUpdate, SubTask, Task};
use crate::TASKS_API;
use reqwest::Response;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unexpected server error: {0}")]
    ServerError(String),
}

// * Helpers ..................................................................

async fn check(response: Response) -> Result<Response, ClientError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ClientError::ServerError(format!("{status}: {error_text}")))
}

async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(check(response).await?.json::<T>().await?)
}

// * Client ...................................................................
// ** Tasks ...................................................................

pub async fn fetch_tasks(base_url: &str) -> Result<Vec<Task>, ClientError> {
    let url = format!("{}/{TASKS_API}", base_url);
    let response = reqwest::get(url).await?;
    json(response).await
}

pub async fn create_task(base_url: &str, task: &Task) -> Result<Task, ClientError> {
    let client = reqwest::Client::new();
    let url = format!("{}/{TASKS_API}", base_url);
    let response = client.post(url).json(task).send().await?;
    json(response).await
}

pub async fn update_task_status(
    base_url: &str,
    task_id: &str,
    status: Status,
) -> Result<MessageResponse, ClientError> {
    let client = reqwest::Client::new();
    let url = format!(
        "{}/{TASKS_API}/{}/status",
        base_url,
        urlencoding::encode(task_id)
    );
    let response = client
        .put(url)
        .json(&StatusUpdate { status })
        .send()
        .await?;
    json(response).await
}

pub async fn delete_task(base_url: &str, task_id: &str) -> Result<(), ClientError> {
    let client = reqwest::Client::new();
    let url = format!("{}/{TASKS_API}/{}", base_url, urlencoding::encode(task_id));
    let response = client.delete(url).send().await?;
    check(response).await?;
    Ok(())
}

// ** Subtasks ................................................................

pub async fn add_subtask(
    base_url: &str,
    task_id: &str,
    subtask: &SubTask,
) -> Result<SubTask, ClientError> {
    let client = reqwest::Client::new();
    let url = format!(
        "{}/{TASKS_API}/{}/subtasks",
        base_url,
        urlencoding::encode(task_id)
    );
    let response = client.post(url).json(subtask).send().await?;
    json(response).await
}

pub async fn update_subtask_status(
    base_url: &str,
    task_id: &str,
    subtask_id: &str,
    status: Status,
) -> Result<MessageResponse, ClientError> {
    let client = reqwest::Client::new();
    let url = format!(
        "{}/{TASKS_API}/{}/subtasks/{}/status",
        base_url,
        urlencoding::encode(task_id),
        urlencoding::encode(subtask_id)
    );
    let response = client
        .put(url)
        .json(&StatusUpdate { status })
        .send()
        .await?;
    json(response).await
}

pub async fn delete_subtask(
    base_url: &str,
    task_id: &str,
    subtask_id: &str,
) -> Result<(), ClientError> {
    let client = reqwest::Client::new();
    let url = format!(
        "{}/{TASKS_API}/{}/subtasks/{}",
        base_url,
        urlencoding::encode(task_id),
        urlencoding::encode(subtask_id)
    );
    let response = client.delete(url).send().await?;
    check(response).await?;
    Ok(())
}
