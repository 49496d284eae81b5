//! Student Registry entry point
//!
//! On the web, mounts onto the registration page and wires DOM events to the
//! form controller. Natively, runs a short scripted session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent};

    use student_registry::platform::default_storage;
    use student_registry::validation::accepts_keystroke;
    use student_registry::{
        Field, FormController, KeyValueStorage, RecordKey, Settings, SubmitOutcome,
    };

    type Controller = FormController<Box<dyn KeyValueStorage>>;

    /// Page session state shared by all event handlers
    struct App {
        controller: Controller,
        settings: Settings,
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn input_element_id(field: Field) -> &'static str {
        match field {
            Field::Name => "studentName",
            Field::Id => "studentId",
            Field::Email => "emailId",
            Field::Contact => "contactNumber",
        }
    }

    fn error_element_id(field: Field) -> &'static str {
        match field {
            Field::Name => "nameError",
            Field::Id => "idError",
            Field::Email => "emailError",
            Field::Contact => "contactError",
        }
    }

    fn input_element(field: Field) -> Option<HtmlInputElement> {
        document()?
            .get_element_by_id(input_element_id(field))?
            .dyn_into()
            .ok()
    }

    impl App {
        /// Push controller inputs into the DOM inputs
        fn sync_inputs(&self) {
            for field in Field::ALL {
                if let Some(input) = input_element(field) {
                    input.set_value(self.controller.input(field));
                }
            }
        }

        /// Show or clear one field's inline error
        fn sync_error(&self, field: Field) {
            let Some(document) = document() else { return };
            let error = self.controller.error(field);
            if let Some(el) = document.get_element_by_id(error_element_id(field)) {
                let text = error.map(|e| e.to_string()).unwrap_or_default();
                el.set_text_content(Some(&text));
            }
            if let Some(input) = document.get_element_by_id(input_element_id(field)) {
                let classes = input.class_list();
                let _ = if error.is_some() {
                    classes.add_1("error")
                } else {
                    classes.remove_1("error")
                };
            }
        }

        fn sync_errors(&self) {
            for field in Field::ALL {
                self.sync_error(field);
            }
        }

        fn sync_submit_label(&self) {
            let Some(document) = document() else { return };
            if let Some(el) = document.query_selector("#submitBtn .btn-text").ok().flatten() {
                el.set_text_content(Some(self.controller.submit_label()));
            }
        }

        /// Full form refresh after submit/edit/cancel
        fn sync_form(&self) {
            self.sync_inputs();
            self.sync_errors();
            self.sync_submit_label();
        }

        /// Rebuild the table body and count from the store
        fn render(&self) {
            let Some(document) = document() else { return };
            let view = self.controller.view();
            if let Some(body) = document.get_element_by_id("studentsTableBody") {
                body.set_inner_html(&view.to_html());
            }
            if let Some(count) = document.get_element_by_id("studentCount") {
                count.set_text_content(Some(&view.count.to_string()));
            }
            self.update_scrollbar();
        }

        /// Cap the table container height once the table grows past the limit
        fn update_scrollbar(&self) {
            let Some(container) = document()
                .and_then(|d| d.get_element_by_id("tableContainer"))
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            else {
                return;
            };
            let max_height = self.settings.max_table_height_px;
            let style = container.style();
            if container.scroll_height() > max_height as i32 {
                let _ = style.set_property("max-height", &format!("{max_height}px"));
                let _ = style.set_property("overflow-y", "auto");
            } else {
                let _ = style.set_property("max-height", "none");
                let _ = style.set_property("overflow-y", "visible");
            }
        }

        /// Show a pending notice once
        fn show_notice(&mut self) {
            if let Some(notice) = self.controller.take_notice() {
                if let Some(window) = web_sys::window() {
                    let _ = window.alert_with_message(notice.message());
                }
            }
        }

        /// Read every DOM input into the controller (covers autofill)
        fn read_inputs(&mut self) {
            for field in Field::ALL {
                if let Some(input) = input_element(field) {
                    self.controller.set_input(field, input.value());
                }
            }
        }

        fn submit(&mut self) {
            self.read_inputs();
            match self.controller.submit() {
                Ok(SubmitOutcome::Rejected) => self.sync_errors(),
                Ok(_) => {
                    self.render();
                    self.sync_form();
                    self.show_notice();
                }
                Err(e) => log::error!("Submit failed: {e}"),
            }
        }

        fn edit(&mut self, key: RecordKey) {
            if let Err(e) = self.controller.edit(key) {
                log::warn!("Edit failed: {e}");
                return;
            }
            self.sync_form();
            if let Some(window) = web_sys::window() {
                window.scroll_to_with_x_and_y(0.0, 0.0);
            }
            if let Some(input) = input_element(Field::Name) {
                let _ = input.focus();
            }
        }

        fn delete(&mut self, key: RecordKey) {
            let confirm = |message: &str| {
                web_sys::window()
                    .and_then(|w| w.confirm_with_message(message).ok())
                    .unwrap_or(false)
            };
            match self.controller.delete(key, confirm) {
                Ok(true) => {
                    self.render();
                    self.sync_form();
                    self.show_notice();
                }
                Ok(false) => {}
                Err(e) => log::warn!("Delete failed: {e}"),
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();

        let storage = default_storage();
        let settings = Settings::load(&storage);
        if console_log::init_with_level(settings.log_level()).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Student Registry starting...");

        let controller = FormController::new(storage, &settings);
        let app = Rc::new(RefCell::new(App {
            controller,
            settings,
        }));

        app.borrow().render();
        app.borrow().sync_form();

        setup_form_handlers(app.clone());
        setup_field_handlers(app.clone());
        setup_table_handlers(app.clone());
        setup_resize_handler(app);

        log::info!("Student Registry ready");
    }

    fn setup_form_handlers(app: Rc<RefCell<App>>) {
        let Some(document) = document() else { return };

        if let Some(form) = document.get_element_by_id("studentForm") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                app.borrow_mut().submit();
            });
            let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("cancelBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.controller.reset();
                a.sync_form();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_field_handlers(app: Rc<RefCell<App>>) {
        for field in Field::ALL {
            let Some(input) = input_element(field) else {
                log::warn!("Missing input #{}", input_element_id(field));
                continue;
            };

            // Live validation
            {
                let app = app.clone();
                let input_clone = input.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    let mut a = app.borrow_mut();
                    a.controller.set_input(field, input_clone.value());
                    a.sync_error(field);
                });
                let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
                closure.forget();
            }

            // Character filter
            {
                let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                    if !accepts_keystroke(field, &event.key()) {
                        event.prevent_default();
                    }
                });
                let _ = input
                    .add_event_listener_with_callback("keypress", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    /// Row buttons are re-created on every render, so clicks are delegated
    /// from the table body and routed by `data-action`/`data-key`.
    fn setup_table_handlers(app: Rc<RefCell<App>>) {
        let Some(body) = document().and_then(|d| d.get_element_by_id("studentsTableBody")) else {
            log::warn!("Missing #studentsTableBody");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(button) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-action]").ok().flatten())
            else {
                return;
            };
            let Some(key) = button
                .get_attribute("data-key")
                .and_then(|k| k.parse::<u32>().ok())
                .map(RecordKey)
            else {
                return;
            };
            match button.get_attribute("data-action").as_deref() {
                Some("edit") => app.borrow_mut().edit(key),
                Some("delete") => app.borrow_mut().delete(key),
                _ => {}
            }
        });
        let _ = body.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize_handler(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow().update_scrollbar();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Student Registry (native) starting...");
    log::info!("Native mode uses in-memory storage - run with `trunk serve` for the web version");

    println!("\nRunning scripted session...");
    scripted_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn scripted_session() {
    use student_registry::platform::default_storage;
    use student_registry::{Field, FormController, Settings, SubmitOutcome};

    let settings = Settings::default();
    let mut controller = FormController::new(default_storage(), &settings);

    let entries = [
        ("Ann Lee", "101", "a@b.co", "1234567890"),
        ("Bob Ray", "102", "bob@example.org", "0987654321"),
        ("Ann Twin", "101", "twin@b.co", "1112223334"),
    ];
    for (name, id, email, contact) in entries {
        controller.set_input(Field::Name, name);
        controller.set_input(Field::Id, id);
        controller.set_input(Field::Email, email);
        controller.set_input(Field::Contact, contact);
        match controller.submit() {
            Ok(SubmitOutcome::Rejected) => {
                for (field, error) in controller.errors() {
                    println!("✗ {name}: {} - {error}", field.as_str());
                }
                controller.reset();
            }
            Ok(outcome) => println!("✓ {name}: {outcome:?}"),
            Err(e) => println!("✗ {name}: {e}"),
        }
    }

    if controller.edit_at(0).is_ok() {
        controller.set_input(Field::Contact, "9999999999");
        match controller.submit() {
            Ok(outcome) => println!("✓ edit row 1: {outcome:?}"),
            Err(e) => println!("✗ edit row 1: {e}"),
        }
    }

    match controller.delete_at(1, |message: &str| {
        println!("? {message} yes");
        true
    }) {
        Ok(deleted) => println!("✓ delete row 2: {deleted}"),
        Err(e) => println!("✗ delete row 2: {e}"),
    }

    let view = controller.view();
    println!("\n{} student(s)\n{}", view.count, view.to_html());
}
