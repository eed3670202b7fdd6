//! Shared test fixtures: a `Lamp` service with overloaded operations, a
//! map-backed service locator, and a collecting outbox.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use huddle_core::descriptor::{OperationDef, TypeDescriptor};
use huddle_core::{Message, Outbox, ServiceInstance, ServiceLocator, Value};
use parking_lot::Mutex;

use crate::config::DispatchConfig;
use crate::index::MethodRegistry;

#[derive(Debug, Default)]
pub struct LampState {
    pub on: bool,
    pub level: i32,
    pub color: String,
}

#[derive(Debug)]
pub struct Lamp {
    pub state: Mutex<LampState>,
}

impl Lamp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(LampState::default()),
        })
    }
}

impl ServiceInstance for Lamp {
    fn type_name(&self) -> &str {
        "Lamp"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn as_lamp(svc: &dyn ServiceInstance) -> anyhow::Result<&Lamp> {
    svc.as_any()
        .downcast_ref::<Lamp>()
        .context("target is not a Lamp")
}

pub fn service_base_descriptor() -> TypeDescriptor {
    TypeDescriptor::builder("Service")
        .operation(OperationDef::new("describe", &[], |svc, _| {
            Ok(Value::from(svc.type_name()))
        }))
        .build()
}

/// `Lamp` exposes `on()`, `on(i32)`, `setColor(String)`, `setColor(Color)`,
/// a capability-typed `follow(ColorSource)`, the excluded-by-name
/// `getMetaData()`, and the inherited `describe()`.
pub fn lamp_descriptor() -> TypeDescriptor {
    TypeDescriptor::builder("Lamp")
        .inherit(&service_base_descriptor())
        .operation(OperationDef::new("on", &[], |svc, _| {
            as_lamp(svc)?.state.lock().on = true;
            Ok(Value::Null)
        }))
        .operation(OperationDef::new("on", &["i32"], |svc, args| {
            let level = args
                .first()
                .and_then(Value::as_i32)
                .context("level must be an Integer")?;
            anyhow::ensure!((0..=100).contains(&level), "level {level} out of range");
            let lamp = as_lamp(svc)?;
            let mut state = lamp.state.lock();
            state.on = true;
            state.level = level;
            Ok(Value::Null)
        }))
        .operation(OperationDef::new("setColor", &["String"], |svc, args| {
            let color = args
                .first()
                .and_then(Value::as_str)
                .context("color must be a String")?;
            as_lamp(svc)?.state.lock().color = color.to_string();
            Ok(Value::Null)
        }))
        .operation(OperationDef::new("setColor", &["Color"], |svc, args| {
            let (_, data) = args
                .first()
                .and_then(Value::as_object)
                .context("color must be a structured color")?;
            let name = data
                .get("name")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("rgb")
                .to_string();
            as_lamp(svc)?.state.lock().color = name;
            Ok(Value::Null)
        }))
        .operation(OperationDef::new("blink", &["Duration"], |svc, args| {
            let (_, data) = args
                .first()
                .and_then(Value::as_object)
                .context("blink interval must be a Duration")?;
            let millis = data
                .get("millis")
                .and_then(serde_json::Value::as_i64)
                .context("Duration must carry millis")?;
            as_lamp(svc)?.state.lock().level = i32::try_from(millis).unwrap_or(i32::MAX);
            Ok(Value::Null)
        }))
        .operation(OperationDef::new("blink", &["i64"], |svc, args| {
            let millis = args
                .first()
                .and_then(Value::as_i64)
                .context("blink interval must be a Long")?;
            as_lamp(svc)?.state.lock().level = i32::try_from(millis).unwrap_or(i32::MAX);
            Ok(Value::Null)
        }))
        .operation(OperationDef::new("follow", &["ColorSource"], |_, _| {
            Ok(Value::Null)
        }))
        .operation(OperationDef::new("getMetaData", &[], |_, _| {
            Ok(Value::from("lamp metadata"))
        }))
        .build()
}

/// Registry with the `Lamp` world registered: the `ColorSource` capability,
/// the `RgbColor` value type (a `Color` descendant), and the `Lamp` type.
pub fn lamp_registry() -> MethodRegistry {
    let registry = MethodRegistry::new(&DispatchConfig::default());
    registry.register_capability("ColorSource");
    registry.register_value_type("Color", &[]);
    registry.register_value_type("RgbColor", &["Color"]);
    registry.register_type(&lamp_descriptor()).unwrap();
    registry
}

pub fn rgb(name: &str) -> Value {
    Value::Object {
        type_name: "RgbColor".into(),
        data: serde_json::json!({ "name": name }),
    }
}

/// Outbox that collects completion notifications for assertions.
#[derive(Debug, Default)]
pub struct CollectingOutbox {
    pub sent: Mutex<Vec<Message>>,
}

impl Outbox for CollectingOutbox {
    fn send(&self, msg: Message) {
        self.sent.lock().push(msg);
    }
}

/// Map-backed service locator.
#[derive(Default)]
pub struct MapLocator {
    services: HashMap<String, Arc<dyn ServiceInstance>>,
}

impl MapLocator {
    #[must_use]
    pub fn with(mut self, name: &str, instance: Arc<dyn ServiceInstance>) -> Self {
        self.services.insert(name.to_string(), instance);
        self
    }
}

impl ServiceLocator for MapLocator {
    fn find(&self, name: &str) -> Option<Arc<dyn ServiceInstance>> {
        self.services.get(name).cloned()
    }
}
