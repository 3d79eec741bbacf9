use super::{Scheduler, Task, TimerId};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// `window.setTimeout` backed scheduler.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn now_ms(&self) -> i64 {
        js_sys::Date::now().round() as i64
    }

    fn set_timeout(&self, delay_ms: u32, task: Task) -> TimerId {
        let Some(win) = web_sys::window() else {
            log::warn!("no window; dropping scheduled task");
            return TimerId(0);
        };

        let cb = Closure::once_into_js(move || task());
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        let tid = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), delay)
            .unwrap_or_else(|e| {
                log::error!("setTimeout failed: {e:?}");
                0
            });
        TimerId(tid)
    }

    fn clear_timeout(&self, id: TimerId) {
        if id.0 == 0 {
            return;
        }
        if let Some(win) = web_sys::window() {
            win.clear_timeout_with_handle(id.0);
        }
    }
}
