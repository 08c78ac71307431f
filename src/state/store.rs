use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::session::Session;
use crate::error::Result;

/// 会话句柄，同一会话的请求在这把锁上串行
pub type SessionHandle = Arc<Mutex<Session>>;

/// 会话存储 trait
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 按 id 取会话，不存在时以该 id 创建；`None` 时生成新 id
    async fn get_or_create(&self, id: Option<&str>) -> Result<SessionHandle>;
    async fn get(&self, id: &str) -> Result<Option<SessionHandle>>;
    async fn remove(&self, id: &str) -> Result<()>;
    /// 淘汰在 `now` 时已空闲超过 `idle` 的会话，返回淘汰数量
    async fn evict_idle_at(&self, now: Instant, idle: Duration) -> Result<usize>;
    async fn len(&self) -> Result<usize>;

    async fn evict_idle(&self, idle: Duration) -> Result<usize> {
        self.evict_idle_at(Instant::now(), idle).await
    }
}

/// 内存存储实现
#[derive(Default)]
pub struct MemorySessionStore {
    inner: RwLock<HashMap<String, SessionHandle>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get_or_create(&self, id: Option<&str>) -> Result<SessionHandle> {
        let id = match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => new_session_id(),
        };

        // 持有表锁时刷新活跃时间，调用方加锁前不会被淘汰
        if let Some(handle) = self.inner.read().get(&id) {
            if let Ok(mut session) = handle.try_lock() {
                session.mark_active();
            }
            return Ok(Arc::clone(handle));
        }

        let mut sessions = self.inner.write();
        let handle = sessions.entry(id.clone()).or_insert_with(|| {
            debug!(session = %id, "creating session");
            Arc::new(Mutex::new(Session::new(id.clone())))
        });
        Ok(Arc::clone(handle))
    }

    async fn get(&self, id: &str) -> Result<Option<SessionHandle>> {
        Ok(self.inner.read().get(id).map(Arc::clone))
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.inner.write().remove(id);
        Ok(())
    }

    async fn evict_idle_at(&self, now: Instant, idle: Duration) -> Result<usize> {
        let mut sessions = self.inner.write();
        let before = sessions.len();
        sessions.retain(|id, handle| match handle.try_lock() {
            Ok(session) => {
                let keep = session.idle_for(now) < idle;
                if !keep {
                    debug!(session = %id, turns = session.turns(), "evicting idle session");
                }
                keep
            }
            // 正在处理请求的会话不淘汰
            Err(_) => true,
        });
        Ok(before - sessions.len())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.inner.read().len())
    }
}

/// 后台定期淘汰空闲会话
pub fn spawn_session_sweeper(
    store: Arc<dyn SessionStore>,
    idle: Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match store.evict_idle(idle).await {
                Ok(0) => {}
                Ok(evicted) => info!(evicted, "evicted idle sessions"),
                Err(err) => warn!(%err, "session sweep failed"),
            }
        }
    })
}
