// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Schedule
//!
//! Contract for schedule capability apps, which replace Nebo's built-in
//! scheduler. Expression evaluation is entirely up to the handler; the SDK
//! only carries the data.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Defines `ScheduleHandler` and schedule records

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::stream::EventStream;

/// A scheduled task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub name: String,
    /// Schedule expression (cron or handler-specific syntax)
    pub expression: String,
    pub task_type: String,
    pub command: String,
    pub message: String,
    pub deliver: String,
    pub enabled: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    pub run_count: i64,
    pub last_error: String,
    pub created_at: Option<DateTime<Utc>>,
    pub metadata: HashMap<String, String>,
}

/// Fields supplied when creating a schedule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSchedule {
    pub name: String,
    pub expression: String,
    pub task_type: String,
    pub command: String,
    pub message: String,
    pub deliver: String,
    pub metadata: HashMap<String, String>,
}

/// Replacement fields for an existing schedule, addressed by `name`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleUpdate {
    pub name: String,
    pub expression: String,
    pub task_type: String,
    pub command: String,
    pub message: String,
    pub deliver: String,
    pub metadata: HashMap<String, String>,
}

/// Pagination and filtering for `list`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleQuery {
    pub limit: i32,
    pub offset: i32,
    pub enabled_only: bool,
}

/// One page of results plus the unpaginated total
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }
}

/// Result of a manual trigger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerOutcome {
    pub success: bool,
    pub output: String,
}

/// One past execution of a schedule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRun {
    pub id: String,
    pub schedule_name: String,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub success: bool,
    pub output: String,
    pub error: String,
}

/// Emitted when a schedule fires
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleTrigger {
    pub schedule_id: String,
    pub name: String,
    pub task_type: String,
    pub command: String,
    pub message: String,
    pub metadata: HashMap<String, String>,
    pub fired_at: Option<DateTime<Utc>>,
}

/// Interface for schedule capability apps.
#[async_trait]
pub trait ScheduleHandler: Send + Sync {
    async fn create(&self, schedule: NewSchedule) -> anyhow::Result<Schedule>;

    async fn get(&self, name: &str) -> anyhow::Result<Schedule>;

    async fn list(&self, query: ScheduleQuery) -> anyhow::Result<Page<Schedule>>;

    async fn update(&self, update: ScheduleUpdate) -> anyhow::Result<Schedule>;

    async fn delete(&self, name: &str) -> anyhow::Result<()>;

    async fn enable(&self, name: &str) -> anyhow::Result<Schedule>;

    async fn disable(&self, name: &str) -> anyhow::Result<Schedule>;

    /// Run a schedule now, outside its regular cadence
    async fn trigger(&self, name: &str) -> anyhow::Result<TriggerOutcome>;

    async fn history(&self, name: &str, limit: i32, offset: i32) -> anyhow::Result<Page<ScheduleRun>>;

    /// Fired schedules, in firing order
    async fn triggers(&self) -> anyhow::Result<EventStream<ScheduleTrigger>>;
}
