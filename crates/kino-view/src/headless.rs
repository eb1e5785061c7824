//! Headless DOM and host
//!
//! [`MemoryElement`] and [`ManualHost`] let the view run without a browser:
//! server-side snapshots, native embedding, and deterministic tests. Frames
//! and timers only run when the owner calls [`ManualHost::run_frames`] or
//! [`ManualHost::advance`].

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use crate::dom::{DomEvent, DomListener, Element, ElementRef, ListenerId};
use crate::host::{Host, LocalTask, Task, TaskHandle};
use crate::types::Rect;
use crate::view::PlayerLayout;

/// In-memory element
pub struct MemoryElement {
    id: String,
    classes: RefCell<Vec<String>>,
    styles: RefCell<BTreeMap<String, String>>,
    attributes: RefCell<BTreeMap<String, String>>,
    children: RefCell<Vec<ElementRef>>,
    bounds: Cell<Rect>,
    connected: Cell<bool>,
    listeners: RefCell<Vec<(ListenerId, DomEvent, DomListener)>>,
    next_listener: Cell<u64>,
    class_writes: Cell<usize>,
}

impl MemoryElement {
    pub fn new(id: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            id: id.into(),
            classes: RefCell::new(Vec::new()),
            styles: RefCell::new(BTreeMap::new()),
            attributes: RefCell::new(BTreeMap::new()),
            children: RefCell::new(Vec::new()),
            bounds: Cell::new(Rect::default()),
            connected: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
            class_writes: Cell::new(0),
        })
    }

    /// Create an element carrying a class, as a template would
    pub fn with_class(id: impl Into<String>, class: &str) -> Rc<Self> {
        let element = Self::new(id);
        element.classes.borrow_mut().push(class.to_string());
        element
    }

    pub fn set_size(&self, width: f64, height: f64) {
        let mut rect = self.bounds.get();
        rect.width = width;
        rect.height = height;
        self.bounds.set(rect);
    }

    pub fn set_bounds(&self, rect: Rect) {
        self.bounds.set(rect);
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.set(connected);
    }

    /// Fire every listener registered for `event`
    pub fn dispatch(&self, event: DomEvent) {
        let snapshot: Vec<DomListener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, e, _)| *e == event)
            .map(|(_, _, l)| l.clone())
            .collect();
        for listener in snapshot {
            listener();
        }
    }

    pub fn listener_count(&self, event: DomEvent) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, e, _)| *e == event)
            .count()
    }

    /// Number of class mutations actually applied
    pub fn class_writes(&self) -> usize {
        self.class_writes.get()
    }

    pub fn children(&self) -> Vec<ElementRef> {
        self.children.borrow().clone()
    }

    fn detach(&self, child: &ElementRef) {
        self.children.borrow_mut().retain(|c| !Rc::ptr_eq(c, child));
    }
}

impl Element for MemoryElement {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn has_class(&self, name: &str) -> bool {
        self.classes.borrow().iter().any(|c| c == name)
    }

    fn add_class(&self, name: &str) {
        if !self.has_class(name) {
            self.classes.borrow_mut().push(name.to_string());
            self.class_writes.set(self.class_writes.get() + 1);
        }
    }

    fn remove_class(&self, name: &str) {
        if self.has_class(name) {
            self.classes.borrow_mut().retain(|c| c != name);
            self.class_writes.set(self.class_writes.get() + 1);
        }
    }

    fn class_names(&self) -> Vec<String> {
        self.classes.borrow().clone()
    }

    fn set_style(&self, property: &str, value: Option<&str>) {
        let mut styles = self.styles.borrow_mut();
        match value {
            Some(v) if !v.is_empty() => {
                styles.insert(property.to_string(), v.to_string());
            }
            _ => {
                styles.remove(property);
            }
        }
    }

    fn style(&self, property: &str) -> Option<String> {
        self.styles.borrow().get(property).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, name: &str) {
        self.attributes.borrow_mut().remove(name);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn append_child(&self, child: &ElementRef) {
        self.detach(child);
        self.children.borrow_mut().push(child.clone());
    }

    fn remove_child(&self, child: &ElementRef) {
        self.detach(child);
    }

    fn insert_before(&self, child: &ElementRef, reference: Option<&ElementRef>) {
        self.detach(child);
        let mut children = self.children.borrow_mut();
        let index = reference
            .and_then(|r| children.iter().position(|c| Rc::ptr_eq(c, r)))
            .unwrap_or(children.len());
        children.insert(index, child.clone());
    }

    fn insert_after(&self, child: &ElementRef, reference: &ElementRef) {
        self.detach(child);
        let mut children = self.children.borrow_mut();
        let index = children
            .iter()
            .position(|c| Rc::ptr_eq(c, reference))
            .map(|i| i + 1)
            .unwrap_or(children.len());
        children.insert(index, child.clone());
    }

    fn contains(&self, child: &ElementRef) -> bool {
        self.children
            .borrow()
            .iter()
            .any(|c| Rc::ptr_eq(c, child) || c.contains(child))
    }

    fn add_listener(&self, event: DomEvent, listener: DomListener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, event, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(existing, _, _)| *existing != id);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Region elements a player template would produce, kept concrete so the
/// owner can resize and attach them
pub struct HeadlessLayout {
    pub container: Rc<MemoryElement>,
    pub media: Rc<MemoryElement>,
    pub preview: Rc<MemoryElement>,
    pub title: Rc<MemoryElement>,
    pub overlays: Rc<MemoryElement>,
    pub aspect: Rc<MemoryElement>,
}

impl HeadlessLayout {
    pub fn new(id: &str) -> Self {
        let container = MemoryElement::with_class(id, "kino-player");
        let media = MemoryElement::with_class(format!("{}-media", id), "kino-media");
        let preview = MemoryElement::with_class(format!("{}-preview", id), "kino-preview");
        let title = MemoryElement::with_class(format!("{}-title", id), "kino-title");
        let overlays = MemoryElement::with_class(format!("{}-overlays", id), "kino-overlays");
        let aspect = MemoryElement::with_class(format!("{}-aspect", id), "kino-aspect");

        for child in [&aspect, &media, &preview, &title, &overlays] {
            let child: ElementRef = child.clone();
            container.append_child(&child);
        }

        Self {
            container,
            media,
            preview,
            title,
            overlays,
            aspect,
        }
    }

    /// Trait-object view handed to the engine
    pub fn layout(&self) -> PlayerLayout {
        PlayerLayout {
            container: self.container.clone(),
            media: self.media.clone(),
            preview: self.preview.clone(),
            title: self.title.clone(),
            overlays: self.overlays.clone(),
            aspect: self.aspect.clone(),
        }
    }
}

/// Host whose clock only moves when told to
pub struct ManualHost {
    next_handle: Cell<u64>,
    now: Cell<Duration>,
    frames: RefCell<Vec<(TaskHandle, Task)>>,
    timers: RefCell<Vec<(TaskHandle, Duration, Task)>>,
    tasks: RefCell<VecDeque<LocalTask>>,
    tab_active: Cell<bool>,
    viewport: Cell<Rect>,
    scroll_locked: Cell<bool>,
    opened_links: RefCell<Vec<(String, Option<String>)>>,
}

impl ManualHost {
    pub fn new() -> Self {
        Self {
            next_handle: Cell::new(1),
            now: Cell::new(Duration::ZERO),
            frames: RefCell::new(Vec::new()),
            timers: RefCell::new(Vec::new()),
            tasks: RefCell::new(VecDeque::new()),
            tab_active: Cell::new(true),
            viewport: Cell::new(Rect::new(0.0, 0.0, 1920.0, 1080.0)),
            scroll_locked: Cell::new(false),
            opened_links: RefCell::new(Vec::new()),
        }
    }

    fn next_handle(&self) -> TaskHandle {
        let handle = TaskHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);
        handle
    }

    /// Run the frame callbacks queued so far; callbacks queued while
    /// running wait for the next call. Returns how many ran.
    pub fn run_frames(&self) -> usize {
        let frames = std::mem::take(&mut *self.frames.borrow_mut());
        let count = frames.len();
        for (_, task) in frames {
            task();
        }
        count
    }

    /// Move the clock forward, firing due timers in deadline order
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
        loop {
            let due = {
                let mut timers = self.timers.borrow_mut();
                let now = self.now.get();
                let next = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, deadline, _))| *deadline <= now)
                    .min_by_key(|(_, (_, deadline, _))| *deadline)
                    .map(|(index, _)| index);
                next.map(|index| timers.remove(index))
            };
            match due {
                Some((_, _, task)) => task(),
                None => break,
            }
        }
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Remove spawned tasks so the caller can drive them
    pub fn take_tasks(&self) -> Vec<LocalTask> {
        self.tasks.borrow_mut().drain(..).collect()
    }

    /// Await spawned tasks one after another, including ones they spawn
    pub async fn run_tasks(&self) {
        loop {
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => task.await,
                None => break,
            }
        }
    }

    pub fn set_tab_active(&self, active: bool) {
        self.tab_active.set(active);
    }

    pub fn set_viewport(&self, viewport: Rect) {
        self.viewport.set(viewport);
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked.get()
    }

    pub fn opened_links(&self) -> Vec<(String, Option<String>)> {
        self.opened_links.borrow().clone()
    }
}

impl Default for ManualHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for ManualHost {
    fn request_frame(&self, task: Task) -> TaskHandle {
        let handle = self.next_handle();
        self.frames.borrow_mut().push((handle, task));
        handle
    }

    fn cancel_frame(&self, handle: TaskHandle) {
        self.frames.borrow_mut().retain(|(h, _)| *h != handle);
    }

    fn set_timeout(&self, task: Task, delay: Duration) -> TaskHandle {
        let handle = self.next_handle();
        let deadline = self.now.get() + delay;
        self.timers.borrow_mut().push((handle, deadline, task));
        handle
    }

    fn clear_timeout(&self, handle: TaskHandle) {
        self.timers.borrow_mut().retain(|(h, _, _)| *h != handle);
    }

    fn spawn_local(&self, task: LocalTask) {
        self.tasks.borrow_mut().push_back(task);
    }

    fn is_tab_active(&self) -> bool {
        self.tab_active.get()
    }

    fn viewport(&self) -> Rect {
        self.viewport.get()
    }

    fn set_scroll_locked(&self, locked: bool) {
        self.scroll_locked.set(locked);
    }

    fn open_link(&self, url: &str, target: Option<&str>) {
        self.opened_links
            .borrow_mut()
            .push((url.to_string(), target.map(str::to_string)));
    }
}
