//! # Event Pipeline Module / 事件管道模块
//!
//! Recorders observe every event of a run. A pipeline keeps them in an explicit
//! ordered list: installing a recorder puts it at the front, and dispatch walks
//! the list front to back. The most recently installed recorder therefore sees
//! each event first, and no recorder can stop the others from seeing it.
//!
//! 记录器观察运行中的每个事件。管道将它们保存在一个显式的有序列表中：
//! 安装记录器时会将其放在最前面，分发时从前往后遍历列表。
//! 因此最近安装的记录器最先看到每个事件，任何记录器都无法阻止其他记录器看到它。

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::core::models::{Event, EventContext};

/// Something that observes events.
///
/// Recording cannot fail: a recorder that does I/O logs and swallows its own
/// errors.
///
/// 观察事件的对象。记录不会失败：执行 I/O 的记录器会自行记录日志并吞掉错误。
pub trait EventRecorder: Send + Sync {
    fn record(&self, event: &Event, context: &EventContext);
}

impl<F> EventRecorder for F
where
    F: Fn(&Event, &EventContext) + Send + Sync,
{
    fn record(&self, event: &Event, context: &EventContext) {
        self(event, context)
    }
}

/// An ordered chain of recorders that behaves as a single recorder.
#[derive(Clone, Default)]
pub struct EventPipeline {
    recorders: VecDeque<Arc<dyn EventRecorder>>,
}

impl EventPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `recorder` ahead of every recorder already installed.
    pub fn install(&mut self, recorder: Arc<dyn EventRecorder>) {
        self.recorders.push_front(recorder);
    }

    pub fn install_recorder<R>(&mut self, recorder: R)
    where
        R: EventRecorder + 'static,
    {
        self.install(Arc::new(recorder));
    }

    pub fn len(&self) -> usize {
        self.recorders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recorders.is_empty()
    }
}

impl EventRecorder for EventPipeline {
    fn record(&self, event: &Event, context: &EventContext) {
        for recorder in &self.recorders {
            recorder.record(event, context);
        }
    }
}

impl fmt::Debug for EventPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventPipeline")
            .field("recorders", &self.recorders.len())
            .finish()
    }
}
