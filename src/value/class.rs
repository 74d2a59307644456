use crate::error::Error;
use crate::interpreter::Interpreter;
use crate::value::callable::Callable;
use crate::value::function::Function;
use crate::value::instance::Instance;
use crate::value::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// The runtime representation of a class declaration. Always held behind
/// `Rc`: the class, its instances and its subclasses share one identity, and
/// the superclass chain is a chain of these handles.
#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<Class>>,

    /// Methods are owned by the class but accessed through instances, which
    /// bind them on the way out.
    methods: HashMap<String, Function>,
}

impl Class {
    pub fn new(
        name: String,
        superclass: Option<Rc<Class>>,
        methods: HashMap<String, Function>,
    ) -> Rc<Self> {
        Rc::new(Self { name, superclass, methods })
    }

    /// Looks in this class first, then walks up the superclass chain, so a
    /// subclass method shadows the inherited one.
    pub fn find_method(&self, name: &str) -> Option<Function> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }

        self.superclass.as_ref().and_then(|superclass| superclass.find_method(name))
    }
}

impl Callable for Rc<Class> {
    /// Calling a class constructs an instance, so the class's arity is its
    /// initializer's arity, or zero when no init exists anywhere on the
    /// chain.
    fn arity(&self) -> usize {
        match self.find_method("init") {
            Some(initializer) => initializer.arity(),
            None => 0,
        }
    }

    fn call(&self, interpreter: &mut Interpreter, args: Vec<Object>) -> Result<Object, Error> {
        let instance = Object::Instance(Rc::new(RefCell::new(Instance::new(Rc::clone(self)))));
        if let Some(initializer) = self.find_method("init") {
            initializer.bind(&instance).call(interpreter, args)?;
        }
        Ok(instance)
    }
}
