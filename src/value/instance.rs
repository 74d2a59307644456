use crate::error::Error;
use crate::token::Token;
use crate::value::class::Class;
use crate::value::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

/// The runtime representation of an instance of a Lox class: a handle on the
/// class plus this object's own mutable state.
#[derive(Debug)]
pub struct Instance {
    pub class: Rc<Class>,
    fields: HashMap<String, Object>,

    /// Host-side storage for built-in classes, keyed separately from fields:
    /// a user field named "items" can never collide with the List backing
    /// vector living here, and property access never sees this map.
    pub metafields: HashMap<String, Rc<RefCell<Vec<Object>>>>,
}

impl Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} instance", self.class.name)
    }
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: HashMap::new(),
            metafields: HashMap::new(),
        }
    }

    /// Property access: fields shadow methods, and a method comes back bound
    /// to this instance. Takes the shared handle, not `&self`, because the
    /// bound method captures it.
    pub fn get(instance: &Rc<RefCell<Instance>>, name: &Token) -> Result<Object, Error> {
        if let Some(value) = instance.borrow().fields.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(method) = instance.borrow().class.find_method(&name.lexeme) {
            return Ok(Object::Function(method.bind(&Object::Instance(Rc::clone(instance)))));
        }

        // An absent property is an error, not nil: a silent dummy value
        // masks more bugs than it helps.
        Err(Error::Runtime {
            token: name.clone(),
            message: format!("Undefined property '{}'.", name.lexeme),
        })
    }

    /// Assignment needs no declaration: any field may spring into being.
    pub fn set(&mut self, name: &str, value: Object) {
        self.fields.insert(name.to_string(), value);
    }

    /// Field read for host code that has no token to report with.
    pub fn field(&self, name: &str) -> Option<Object> {
        self.fields.get(name).cloned()
    }
}
