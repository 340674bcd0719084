//! Liveness endpoint

use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use sysinfo::System;

#[derive(Debug, Serialize)]
pub struct MemoryUsage {
    pub rss_bytes: u64,
    pub virtual_bytes: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `shutting_down` while draining
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    /// Seconds since startup
    pub uptime: f64,
    pub memory: MemoryUsage,
}

fn process_memory() -> MemoryUsage {
    let mut system = System::new();
    let usage = sysinfo::get_current_pid().ok().and_then(|pid| {
        system.refresh_process(pid);
        system
            .process(pid)
            .map(|process| (process.memory(), process.virtual_memory()))
    });

    match usage {
        Some((rss_bytes, virtual_bytes)) => MemoryUsage {
            rss_bytes,
            virtual_bytes,
        },
        None => {
            tracing::debug!("Process memory unavailable");
            MemoryUsage {
                rss_bytes: 0,
                virtual_bytes: 0,
            }
        }
    }
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let status = if state.readiness.is_ready() {
        "ok"
    } else {
        "shutting_down"
    };

    Json(HealthResponse {
        status,
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        memory: process_memory(),
    })
}
