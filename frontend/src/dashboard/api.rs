use crate::env_variable_utils::BACKEND_URL;
use crate::models::{ChannelPage, Dashboard, ErrorResponse, FilterChoice, FlagFilter, PageAction};
use gloo_net::http::{Request, Response};

pub async fn load_dashboard() -> Result<Dashboard, String> {
    let url = format!("{}/dashboard", &*BACKEND_URL);

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.ok() {
        response
            .json::<Dashboard>()
            .await
            .map_err(|e| format!("JSON parse error: {}", e))
    } else {
        Err(error_message(response).await)
    }
}

pub async fn load_channel_page(
    preset: &str,
    filters: &[(FlagFilter, FilterChoice)],
    page: usize,
    action: Option<PageAction>,
) -> Result<ChannelPage, String> {
    let url = channel_page_url(&*BACKEND_URL, preset, filters, page, action);

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.ok() {
        response
            .json::<ChannelPage>()
            .await
            .map_err(|e| format!("JSON parse error: {}", e))
    } else {
        Err(error_message(response).await)
    }
}

pub fn channel_page_url(
    backend_url: &str,
    preset: &str,
    filters: &[(FlagFilter, FilterChoice)],
    page: usize,
    action: Option<PageAction>,
) -> String {
    let mut url = format!(
        "{}/channels?preset={}&page={}",
        backend_url.trim_end_matches('/'),
        urlencoding::encode(preset),
        page
    );

    for (filter, choice) in filters {
        url.push_str(&format!("&{}={}", filter.query_key(), choice.key()));
    }
    if let Some(action) = action {
        url.push_str(&format!("&action={}", action.key()));
    }
    url
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(error_text) => match serde_json::from_str::<ErrorResponse>(&error_text) {
            Ok(error_response) => error_response.message,
            Err(_) => format!("HTTP error ({}): {}", status, error_text),
        },
        Err(_) => format!("HTTP error: {}", status),
    }
}
