use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::error::AppError;
use crate::model::Queue;

use super::execute_request;
use super::models::{MatchDto, SummonerDto};

const MATCH_ID_PAGE_SIZE: usize = 100;

/// Summoner-V4 and Match-V5 client. Requests are paced with an in-memory
/// limiter (20 req/sec, the dev-key burst limit) on top of the shared 429
/// retry handling.
pub struct LolApiClient {
    api_key: String,
    region: String,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl LolApiClient {
    pub fn new(config: &Config) -> Self {
        let rate_limiter = RateLimiter::direct(Quota::per_second(NonZeroU32::new(20).unwrap()));

        LolApiClient {
            api_key: config.api_key.clone(),
            region: config.region.clone(),
            rate_limiter,
        }
    }

    /// Match-V5 lives on regional routing hosts, not platform hosts.
    fn regional_routing(&self) -> &str {
        match self.region.as_str() {
            "na1" | "br1" | "la1" | "la2" => "americas",
            "euw1" | "eun1" | "tr1" | "ru" => "europe",
            "kr" | "jp1" => "asia",
            "oc1" | "ph2" | "sg2" | "th2" | "vn2" => "sea",
            _ => "americas",
        }
    }

    fn request(&self, url: &str) -> Result<String, AppError> {
        while self.rate_limiter.check().is_err() {
            thread::sleep(Duration::from_millis(50));
        }

        execute_request(url, &self.api_key)
    }

    pub fn get_summoner(&self, puuid: &str) -> Result<SummonerDto, AppError> {
        let url = format!(
            "https://{}.api.riotgames.com/lol/summoner/v4/summoners/by-puuid/{}",
            self.region, puuid
        );

        let body = self.request(&url)?;
        serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
    }

    fn get_match_id_page(
        &self,
        puuid: &str,
        queue: Queue,
        start_time: i64,
        end_time: i64,
        start: usize,
    ) -> Result<Vec<String>, AppError> {
        let url = format!(
            "https://{}.api.riotgames.com/lol/match/v5/matches/by-puuid/{}/ids?queue={}&startTime={}&endTime={}&start={}&count={}",
            self.regional_routing(),
            puuid,
            queue.id(),
            start_time,
            end_time,
            start,
            MATCH_ID_PAGE_SIZE
        );

        let body = self.request(&url)?;
        serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
    }

    /// Ids of all matches in the given queues started after `cutoff`, paging
    /// each queue until its window is exhausted.
    pub fn get_match_ids_since(
        &self,
        puuid: &str,
        queues: &[Queue],
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<String>, AppError> {
        let start_time = cutoff.timestamp();
        let end_time = Utc::now().timestamp();

        let mut ids = Vec::new();

        for &queue in queues {
            let mut start = 0;

            loop {
                let page = self.get_match_id_page(puuid, queue, start_time, end_time, start)?;
                let page_len = page.len();
                ids.extend(page);

                if page_len < MATCH_ID_PAGE_SIZE {
                    break;
                }

                start += MATCH_ID_PAGE_SIZE;
            }
        }

        Ok(ids)
    }

    pub fn get_match(&self, match_id: &str) -> Result<MatchDto, AppError> {
        let url = format!(
            "https://{}.api.riotgames.com/lol/match/v5/matches/{}",
            self.regional_routing(),
            match_id
        );

        let body = self.request(&url)?;
        serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
    }
}
