use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveTime;

use crate::auth::JwtConfig;

/// 服务器配置 - 餐厅后端的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/dine | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | MIN_PARTY_SIZE | 1 | 最小用餐人数 |
/// | MAX_PARTY_SIZE | 12 | 最大用餐人数 |
/// | MAX_RESERVATION_DAYS_ADVANCE | 30 | 最大提前预订天数 |
/// | TURNOVER_MINUTES | 90 | 默认翻台时长(分钟) |
/// | SECTION_TURNOVER | (空) | 分区翻台覆盖, 如 "Private Dining=120,Terrace=60" |
/// | STRICT_PREFERRED_TABLE | false | 首选桌台不可用时拒绝而非回退 |
/// | ALLOCATION_MAX_RETRIES | 3 | 分配冲突重试上限 |
/// | STORAGE_TIMEOUT_MS | 5000 | 存储操作超时(毫秒) |
/// | RESERVATION_TIME_SLOTS | 营业时段 | 有效时段, "HH:MM" 逗号分隔 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/dine HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 餐厅信息 (通知、聊天回复使用)
    pub restaurant: RestaurantInfo,
    /// 预订策略
    pub reservations: ReservationPolicy,
}

/// 餐厅标识信息
#[derive(Debug, Clone)]
pub struct RestaurantInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub kitchen_closing_time: NaiveTime,
}

/// 预订策略配置
#[derive(Debug, Clone)]
pub struct ReservationPolicy {
    /// 有效预订时段集合 (有限、有序)
    pub valid_slots: Vec<NaiveTime>,
    pub min_party_size: i32,
    pub max_party_size: i32,
    /// 最大提前预订天数
    pub max_advance_days: i64,
    /// 默认翻台时长 (分钟)
    pub turnover_minutes: i64,
    /// 分区翻台覆盖: section -> 分钟
    pub section_turnover: HashMap<String, i64>,
    /// 首选桌台不可用时: true = 拒绝, false = 回退到最优适配
    pub strict_preferred_table: bool,
    /// 分配冲突时的内部重试上限
    pub allocation_max_retries: u32,
    /// 存储操作超时 (毫秒)
    pub storage_timeout_ms: u64,
}

impl ReservationPolicy {
    /// 指定分区的翻台时长 (分钟)
    pub fn turnover_for(&self, section: &str) -> i64 {
        self.section_turnover
            .get(section)
            .copied()
            .unwrap_or(self.turnover_minutes)
    }

    /// 时段是否属于有效集合
    pub fn is_valid_slot(&self, slot: NaiveTime) -> bool {
        self.valid_slots.contains(&slot)
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }
}

/// 默认时段表 — 午市 11:00-14:30, 晚市 18:00-22:00, 半小时一档
const DEFAULT_SLOTS: &[&str] = &[
    "11:00", "11:30", "12:00", "12:30", "13:00", "13:30", "14:00", "14:30", "18:00", "18:30",
    "19:00", "19:30", "20:00", "20:30", "21:00", "21:30", "22:00",
];

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/dine".into()),
            http_port: env_parse("HTTP_PORT", 3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            restaurant: RestaurantInfo {
                name: std::env::var("RESTAURANT_NAME").unwrap_or_else(|_| "DINE24".into()),
                phone: std::env::var("RESTAURANT_PHONE")
                    .unwrap_or_else(|_| "+91 98765 43210".into()),
                email: std::env::var("RESTAURANT_EMAIL")
                    .unwrap_or_else(|_| "info@dine24.com".into()),
                opening_time: env_time("OPENING_TIME", "11:00"),
                closing_time: env_time("CLOSING_TIME", "23:00"),
                kitchen_closing_time: env_time("KITCHEN_CLOSING_TIME", "22:30"),
            },
            reservations: ReservationPolicy {
                valid_slots: parse_slots(
                    std::env::var("RESERVATION_TIME_SLOTS").ok().as_deref(),
                ),
                min_party_size: env_parse("MIN_PARTY_SIZE", 1),
                max_party_size: env_parse("MAX_PARTY_SIZE", 12),
                max_advance_days: env_parse("MAX_RESERVATION_DAYS_ADVANCE", 30),
                turnover_minutes: parse_turnover(
                    std::env::var("TURNOVER_MINUTES").ok().as_deref(),
                ),
                section_turnover: parse_section_turnover(
                    std::env::var("SECTION_TURNOVER").ok().as_deref(),
                ),
                strict_preferred_table: env_parse("STRICT_PREFERRED_TABLE", false),
                allocation_max_retries: env_parse("ALLOCATION_MAX_RETRIES", 3),
                storage_timeout_ms: env_parse("STORAGE_TIMEOUT_MS", 5000),
            },
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录 (work_dir/logs)
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_time(key: &str, default: &str) -> NaiveTime {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    NaiveTime::parse_from_str(&raw, "%H:%M").unwrap_or_else(|_| {
        tracing::warn!("Invalid time in {key}: '{raw}', falling back to {default}");
        NaiveTime::parse_from_str(default, "%H:%M").expect("default time is valid")
    })
}

/// 解析逗号分隔的 "HH:MM" 时段表；无效项跳过并告警
fn parse_slots(raw: Option<&str>) -> Vec<NaiveTime> {
    let entries: Vec<&str> = match raw {
        Some(raw) if !raw.trim().is_empty() => raw.split(',').collect(),
        _ => DEFAULT_SLOTS.to_vec(),
    };
    let mut slots: Vec<NaiveTime> = entries
        .iter()
        .filter_map(|s| {
            let trimmed = s.trim();
            match NaiveTime::parse_from_str(trimmed, "%H:%M") {
                Ok(t) => Some(t),
                Err(_) => {
                    tracing::warn!("Skipping invalid reservation slot: '{trimmed}'");
                    None
                }
            }
        })
        .collect();
    slots.sort();
    slots.dedup();
    slots
}

/// 默认翻台时长 (分钟)
const DEFAULT_TURNOVER_MINUTES: i64 = 90;

/// 解析翻台时长；非正值会使占用窗口为空或反转，从而绕过冲突检查，
/// 因此一律回退到默认值
fn parse_turnover(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return DEFAULT_TURNOVER_MINUTES;
    };
    match raw.trim().parse::<i64>() {
        Ok(m) if m > 0 => m,
        _ => {
            tracing::warn!(
                "Invalid TURNOVER_MINUTES: '{raw}', falling back to {DEFAULT_TURNOVER_MINUTES}"
            );
            DEFAULT_TURNOVER_MINUTES
        }
    }
}

/// 解析 "Section=minutes" 逗号分隔对
fn parse_section_turnover(raw: Option<&str>) -> HashMap<String, i64> {
    let mut map = HashMap::new();
    let Some(raw) = raw else {
        return map;
    };
    for pair in raw.split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        match pair.split_once('=') {
            Some((section, minutes)) => match minutes.trim().parse::<i64>() {
                Ok(m) if m > 0 => {
                    map.insert(section.trim().to_string(), m);
                }
                _ => tracing::warn!("Skipping invalid section turnover: '{pair}'"),
            },
            None => tracing::warn!("Skipping invalid section turnover: '{pair}'"),
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_slots_are_sorted_and_complete() {
        let slots = parse_slots(None);
        assert_eq!(slots.len(), 17);
        assert!(slots.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn custom_slots_skip_invalid_entries() {
        let slots = parse_slots(Some("12:00, nonsense, 18:30"));
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn turnover_rejects_non_positive_values() {
        assert_eq!(parse_turnover(Some("120")), 120);
        assert_eq!(parse_turnover(None), 90);
        // Zero or negative turnover would make every window empty
        assert_eq!(parse_turnover(Some("0")), 90);
        assert_eq!(parse_turnover(Some("-45")), 90);
        assert_eq!(parse_turnover(Some("soon")), 90);
    }

    #[test]
    fn section_turnover_parsing() {
        let map = parse_section_turnover(Some("Private Dining=120, Terrace=60, bogus"));
        assert_eq!(map.get("Private Dining"), Some(&120));
        assert_eq!(map.get("Terrace"), Some(&60));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn turnover_falls_back_to_default() {
        let policy = ReservationPolicy {
            valid_slots: parse_slots(None),
            min_party_size: 1,
            max_party_size: 12,
            max_advance_days: 30,
            turnover_minutes: 90,
            section_turnover: parse_section_turnover(Some("Private Dining=120")),
            strict_preferred_table: false,
            allocation_max_retries: 3,
            storage_timeout_ms: 5000,
        };
        assert_eq!(policy.turnover_for("Private Dining"), 120);
        assert_eq!(policy.turnover_for("Main Dining"), 90);
    }
}
