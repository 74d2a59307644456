use crate::error::Error;
use crate::token::Token;
use crate::value::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Environments are shared, not owned by their block: a closure keeps its
/// defining frame alive long after the block that created it has exited, and
/// a frame may be reachable from several closures at once.
pub type MutableEnvironment = Rc<RefCell<Environment>>;

/// A single frame of the lexical scope chain: a name-to-value map plus an
/// optional link to the enclosing frame.
#[derive(Debug)]
pub struct Environment {
    values: HashMap<String, Object>,
    enclosing: Option<MutableEnvironment>,
}

impl Environment {
    /// A root frame with no enclosing scope: the globals, or the detached
    /// closure a native function starts from.
    pub fn new() -> MutableEnvironment {
        Rc::new(RefCell::new(Self {
            values: HashMap::new(),
            enclosing: None,
        }))
    }

    /// A local frame nested inside the given outer one.
    pub fn new_enclosing(enclosing: &MutableEnvironment) -> MutableEnvironment {
        Rc::new(RefCell::new(Self {
            values: HashMap::new(),
            enclosing: Some(Rc::clone(enclosing)),
        }))
    }

    /// A new variable always lands in the current innermost frame, shadowing
    /// any outer binding of the same name. Redefinition overwrites.
    pub fn define(&mut self, name: String, value: Object) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &Token) -> Result<Object, Error> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        match &self.enclosing {
            Some(outer) => outer.borrow().get(name),
            None => Err(Error::Runtime {
                token: name.clone(),
                message: format!("Undefined variable '{}'.", name.lexeme),
            }),
        }
    }

    /// Unlike define, assign may not create a variable: the name must
    /// already exist somewhere on the chain, and the innermost frame that
    /// has it takes the new value.
    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), Error> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        match &self.enclosing {
            Some(outer) => outer.borrow_mut().assign(name, value),
            None => Err(Error::Runtime {
                token: name.clone(),
                message: format!("Undefined variable '{}'.", name.lexeme),
            }),
        }
    }

    /// Direct read at a distance the resolver computed. Absence yields nil;
    /// only the injected 'this' and 'super' names are ever read this way
    /// without a preceding define, and the resolver guarantees those.
    pub fn get_at(environment: &MutableEnvironment, distance: usize, name: &str) -> Object {
        Self::ancestor(environment, distance)
            .borrow()
            .values
            .get(name)
            .cloned()
            .unwrap_or(Object::Nil)
    }

    /// Direct write at a resolved distance.
    pub fn assign_at(environment: &MutableEnvironment, distance: usize, name: &Token, value: Object) {
        Self::ancestor(environment, distance)
            .borrow_mut()
            .values
            .insert(name.lexeme.clone(), value);
    }

    /// Name-based lookup for host code that has no token to report with.
    pub fn get_by_name(&self, name: &str) -> Option<Object> {
        if let Some(value) = self.values.get(name) {
            return Some(value.clone());
        }
        self.enclosing.as_ref().and_then(|outer| outer.borrow().get_by_name(name))
    }

    /// The frame exactly `distance` hops out. The resolver only ever hands
    /// out distances that stay within the chain.
    fn ancestor(environment: &MutableEnvironment, distance: usize) -> MutableEnvironment {
        let mut frame = Rc::clone(environment);
        for _ in 0..distance {
            let enclosing = frame
                .borrow()
                .enclosing
                .clone()
                .expect("resolved distance stays within the scope chain");
            frame = enclosing;
        }
        frame
    }
}
