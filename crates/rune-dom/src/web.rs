//! `web-sys` backend.
//!
//! Frames come from `requestAnimationFrame` and completion signals from the
//! element's `transitionend` event. Each callback pushes a [`HostEvent`] into
//! the [`Inbox`] and wakes the [`Driver`], which pumps the inbox into its
//! state machine.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::{Rc, Weak},
};

use rune_transition::{ClassList, Dom, Driven, HostEvent, RunId};
use tracing::{trace, warn};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{Event, HtmlElement, Window};

use crate::error::{DomError, Result};
use crate::inbox::{Inbox, pump};

type Listener = Closure<dyn FnMut(Event)>;
type Wake = Rc<dyn Fn()>;

/// Look up an element by id in the current document.
pub fn element_by_id(id: &str) -> Result<HtmlElement> {
    let window = web_sys::window().ok_or(DomError::NoWindow)?;
    let document = window.document().ok_or(DomError::NoDocument)?;
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| DomError::MissingElement(id.to_string()))?;
    element
        .dyn_into::<HtmlElement>()
        .map_err(|_| DomError::NotHtmlElement(id.to_string()))
}

/// [`Dom`] implementation backed by the live page.
pub struct WebDom {
    window: Window,
    inbox: Inbox,
    wake: Wake,
    frame_scheduled: Rc<Cell<bool>>,
    listeners: HashMap<RunId, (HtmlElement, Listener)>,
    // Unlistened closures may still be on the JS stack; dropped on the next pump.
    retired: Vec<Listener>,
}

impl WebDom {
    fn new(window: Window, inbox: Inbox, wake: Wake) -> Self {
        Self {
            window,
            inbox,
            wake,
            frame_scheduled: Rc::new(Cell::new(false)),
            listeners: HashMap::new(),
            retired: Vec::new(),
        }
    }

    /// Number of armed `transitionend` listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn release_retired(&mut self) {
        self.retired.clear();
    }
}

impl Dom for WebDom {
    type Node = HtmlElement;

    fn add_classes(&mut self, node: &HtmlElement, classes: &ClassList) {
        let list = node.class_list();
        for class in classes.iter() {
            if let Err(err) = list.add_1(class) {
                warn!(class, ?err, "classList.add failed");
            }
        }
    }

    fn remove_classes(&mut self, node: &HtmlElement, classes: &ClassList) {
        let list = node.class_list();
        for class in classes.iter() {
            if let Err(err) = list.remove_1(class) {
                warn!(class, ?err, "classList.remove failed");
            }
        }
    }

    fn set_display(&mut self, node: &HtmlElement, display: Option<&str>) {
        set_style(node, "display", display);
    }

    fn set_transition_property(&mut self, node: &HtmlElement, value: Option<&str>) {
        set_style(node, "transition-property", value);
    }

    fn computed_display(&self, node: &HtmlElement) -> Option<String> {
        let style = self.window.get_computed_style(node).ok().flatten()?;
        style.get_property_value("display").ok()
    }

    fn request_frame(&mut self) {
        if self.frame_scheduled.replace(true) {
            return;
        }
        let scheduled = Rc::clone(&self.frame_scheduled);
        let inbox = self.inbox.clone();
        let wake = Rc::clone(&self.wake);
        let callback = Closure::once_into_js(move || {
            scheduled.set(false);
            inbox.push(HostEvent::Frame);
            wake();
        });
        if let Err(err) = self
            .window
            .request_animation_frame(callback.unchecked_ref())
        {
            warn!(?err, "requestAnimationFrame failed");
            self.frame_scheduled.set(false);
        }
    }

    fn listen_transition_end(&mut self, node: &HtmlElement, run: RunId) {
        let own: JsValue = node.clone().into();
        let inbox = self.inbox.clone();
        let wake = Rc::clone(&self.wake);
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            // Transitions on descendants bubble up; only our own count.
            if event.target().map(JsValue::from).as_ref() != Some(&own) {
                return;
            }
            inbox.push(HostEvent::TransitionEnd(run));
            wake();
        });
        if let Err(err) = node
            .add_event_listener_with_callback("transitionend", listener.as_ref().unchecked_ref())
        {
            warn!(%run, ?err, "addEventListener failed");
            return;
        }
        trace!(%run, "transitionend listener armed");
        self.listeners.insert(run, (node.clone(), listener));
    }

    fn unlisten_transition_end(&mut self, _node: &HtmlElement, run: RunId) {
        let Some((node, listener)) = self.listeners.remove(&run) else {
            return;
        };
        if let Err(err) = node.remove_event_listener_with_callback(
            "transitionend",
            listener.as_ref().unchecked_ref(),
        ) {
            warn!(%run, ?err, "removeEventListener failed");
        }
        self.retired.push(listener);
    }
}

fn set_style(node: &HtmlElement, property: &str, value: Option<&str>) {
    let style = node.style();
    let result = match value {
        Some(value) => style.set_property(property, value),
        None => style.remove_property(property).map(drop),
    };
    if let Err(err) = result {
        warn!(property, ?err, "inline style write failed");
    }
}

struct DriverState<M> {
    dom: WebDom,
    machine: M,
    on_change: Option<Box<dyn FnMut(&M)>>,
}

impl<M: Driven<WebDom>> DriverState<M> {
    fn pump(&mut self, inbox: &Inbox) -> usize {
        self.dom.release_retired();
        pump(inbox, &mut self.dom, &mut self.machine)
    }

    fn notify(&mut self) {
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&self.machine);
        }
    }
}

/// Owns a state machine and its [`WebDom`], and delivers browser callbacks
/// to it.
///
/// Cloning shares the same machine.
pub struct Driver<M> {
    state: Rc<RefCell<DriverState<M>>>,
    inbox: Inbox,
}

impl<M> Clone for Driver<M> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            inbox: self.inbox.clone(),
        }
    }
}

impl<M: Driven<WebDom> + 'static> Driver<M> {
    pub fn new(machine: M) -> Result<Self> {
        let window = web_sys::window().ok_or(DomError::NoWindow)?;
        let inbox = Inbox::new();
        let state = Rc::new_cyclic(|weak: &Weak<RefCell<DriverState<M>>>| {
            let weak = weak.clone();
            let pending = inbox.clone();
            let wake: Wake = Rc::new(move || {
                let Some(state) = weak.upgrade() else {
                    return;
                };
                // Already pumping further up the stack; that loop picks the event up.
                if let Ok(mut state) = state.try_borrow_mut()
                    && state.pump(&pending) > 0
                {
                    state.notify();
                }
            });
            RefCell::new(DriverState {
                dom: WebDom::new(window, inbox.clone(), wake),
                machine,
                on_change: None,
            })
        });
        Ok(Self { state, inbox })
    }

    /// Run `f` against the machine, then deliver anything it queued.
    ///
    /// ```ignore
    /// let snapshot = driver.update(|t, dom| t.set_visible(dom, true));
    /// ```
    pub fn update<R>(&self, f: impl FnOnce(&mut M, &mut WebDom) -> R) -> R {
        let mut state = self.state.borrow_mut();
        let DriverState { dom, machine, .. } = &mut *state;
        let result = f(machine, dom);
        state.pump(&self.inbox);
        state.notify();
        result
    }

    /// Read the machine without driving it.
    pub fn with<R>(&self, f: impl FnOnce(&M) -> R) -> R {
        f(&self.state.borrow().machine)
    }

    /// Called after every batch of host events and every [`update`](Self::update).
    ///
    /// The callback runs while the driver is borrowed and must not call back
    /// into it.
    pub fn on_change(&self, f: impl FnMut(&M) + 'static) {
        self.state.borrow_mut().on_change = Some(Box::new(f));
    }
}
