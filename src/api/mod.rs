pub mod lol;
pub mod models;
pub mod playvs;
pub mod riot;

use std::thread;
use std::time::Duration;

use crate::error::AppError;

const USER_AGENT: &str = "lolscout/0.1.0";
const MAX_RETRIES: u32 = 3;

/// Issues an authenticated GET against the Riot API, retrying on 429 with
/// the server-suggested backoff.
pub(crate) fn execute_request(url: &str, api_key: &str) -> Result<String, AppError> {
    let mut retry_count = 0;

    loop {
        let response = ureq::get(url)
            .set("X-Riot-Token", api_key)
            .set("User-Agent", USER_AGENT)
            .call();

        match response {
            Ok(resp) => {
                return resp
                    .into_string()
                    .map_err(|e| AppError::HttpError(e.to_string()));
            }
            Err(ureq::Error::Status(403, _)) => {
                return Err(AppError::ApiError(
                    "forbidden, possibly a bad riot api key".to_string(),
                ));
            }
            Err(ureq::Error::Status(404, _)) => {
                return Err(AppError::NotFound(url.to_string()));
            }
            Err(ureq::Error::Status(429, resp)) => {
                if retry_count >= MAX_RETRIES {
                    return Err(AppError::RateLimited);
                }

                let wait_secs = resp
                    .header("Retry-After")
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(2 * (retry_count + 1) as u64);

                println!("⏳ Rate limited, waiting {}s before retry...", wait_secs);
                thread::sleep(Duration::from_secs(wait_secs));
                retry_count += 1;
            }
            Err(ureq::Error::Status(code, _)) => {
                return Err(AppError::HttpError(format!("status code {}", code)));
            }
            Err(e) => {
                return Err(AppError::HttpError(e.to_string()));
            }
        }
    }
}
