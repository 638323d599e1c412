//! Route table
//!
//! Built once at startup from explicitly registered resources, then read-only.
//! Each route owns the receiver its actions were bound to; looking up
//! `(route, action)` yields a callable that needs no further arguments.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::logger;

/// Action bound to its route's receiver
pub type Action = Arc<dyn Fn() -> String + Send + Sync>;

/// A type whose values can be mounted as a route
///
/// The implementation lists the actions the type exposes; names are matched
/// case-insensitively.
///
/// ```
/// use apimux::router::{Resource, RouteTable};
///
/// struct Users;
///
/// impl Users {
///     fn list(&self) -> String {
///         "alice, bob".to_string()
///     }
/// }
///
/// impl Resource for Users {
///     const NAME: &'static str = "Users";
///
///     fn actions() -> Vec<(&'static str, fn(&Self) -> String)> {
///         vec![("List", Self::list)]
///     }
/// }
///
/// let mut builder = RouteTable::builder();
/// builder.resource(Users).unwrap();
/// let table = builder.build();
/// assert!(table.lookup("users", "LIST").is_ok());
/// ```
pub trait Resource: Send + Sync + Sized + 'static {
    /// Route name
    const NAME: &'static str;

    /// Action names with the methods they call
    fn actions() -> Vec<(&'static str, fn(&Self) -> String)>;
}

/// One route: the receiver's type and its actions by lower-cased name
pub struct RouteEntry {
    receiver: &'static str,
    actions: HashMap<String, Action>,
}

impl RouteEntry {
    /// Type name of the bound receiver
    pub const fn receiver(&self) -> &'static str {
        self.receiver
    }

    /// Lower-cased action names, sorted
    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("receiver", &self.receiver)
            .field("actions", &self.action_names())
            .finish()
    }
}

/// Why a lookup found nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Miss {
    Route,
    Action,
}

/// Read-only mapping from route name to `RouteEntry`
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: HashMap<String, RouteEntry>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Find the action for a route/action pair, both matched case-insensitively
    pub fn lookup(&self, route: &str, action: &str) -> Result<&Action, Miss> {
        let entry = self.routes.get(&route.to_lowercase()).ok_or(Miss::Route)?;
        entry
            .actions
            .get(&action.to_lowercase())
            .ok_or(Miss::Action)
    }

    pub fn route(&self, name: &str) -> Option<&RouteEntry> {
        self.routes.get(&name.to_lowercase())
    }

    /// Lower-cased route names, sorted
    pub fn route_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Collects routes until `build` freezes them into a `RouteTable`
#[derive(Default)]
pub struct RouteTableBuilder {
    routes: HashMap<String, RouteEntry>,
}

impl RouteTableBuilder {
    /// Mount `receiver` under `name`; add its actions on the returned builder
    pub fn route<T>(&mut self, name: &str, receiver: T) -> Result<RouteBuilder<'_, T>, ConfigError>
    where
        T: Send + Sync + 'static,
    {
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        let key = name.to_lowercase();
        if self.routes.contains_key(&key) {
            return Err(ConfigError::DuplicateRoute(key));
        }

        let entry = self.routes.entry(key.clone()).or_insert(RouteEntry {
            receiver: std::any::type_name::<T>(),
            actions: HashMap::new(),
        });
        Ok(RouteBuilder {
            route: key,
            entry,
            receiver: Arc::new(receiver),
        })
    }

    /// Mount a `Resource` under its own name with all the actions it lists
    pub fn resource<R: Resource>(&mut self, receiver: R) -> Result<&mut Self, ConfigError> {
        let mut route = self.route(R::NAME, receiver)?;
        for (name, method) in R::actions() {
            route = route.action(name, method)?;
        }
        Ok(self)
    }

    pub fn build(self) -> RouteTable {
        RouteTable {
            routes: self.routes,
        }
    }
}

/// Adds actions bound to one route's receiver
pub struct RouteBuilder<'a, T> {
    route: String,
    entry: &'a mut RouteEntry,
    receiver: Arc<T>,
}

impl<T: Send + Sync + 'static> RouteBuilder<'_, T> {
    /// Expose `method` as `name` on this route
    pub fn action<F>(self, name: &str, method: F) -> Result<Self, ConfigError>
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        let key = name.to_lowercase();
        if self.entry.actions.contains_key(&key) {
            return Err(ConfigError::DuplicateAction {
                route: self.route.clone(),
                action: key,
            });
        }

        let receiver = Arc::clone(&self.receiver);
        logger::log_route_registered(&self.route, &key);
        self.entry
            .actions
            .insert(key, Arc::new(move || method(receiver.as_ref())));
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Users {
        names: Vec<&'static str>,
    }

    impl Users {
        fn list(&self) -> String {
            self.names.join(",")
        }

        fn index(&self) -> String {
            format!("{} users", self.names.len())
        }
    }

    impl Resource for Users {
        const NAME: &'static str = "Users";

        fn actions() -> Vec<(&'static str, fn(&Self) -> String)> {
            vec![("List", Self::list), ("Index", Self::index)]
        }
    }

    fn users() -> Users {
        Users {
            names: vec!["alice", "bob"],
        }
    }

    #[test]
    fn test_resource_is_mounted_lower_cased() {
        let mut builder = RouteTable::builder();
        builder.resource(users()).unwrap();
        let table = builder.build();

        assert_eq!(table.route_names(), vec!["users"]);
        assert_eq!(table.route("USERS").unwrap().action_names(), vec!["index", "list"]);
        assert_eq!(table.lookup("Users", "List").unwrap()(), "alice,bob");
        assert_eq!(table.lookup("users", "index").unwrap()(), "2 users");
    }

    #[test]
    fn test_lookup_misses() {
        let mut builder = RouteTable::builder();
        builder.resource(users()).unwrap();
        let table = builder.build();

        assert_eq!(table.lookup("ghosts", "list").err(), Some(Miss::Route));
        assert_eq!(table.lookup("users", "delete").err(), Some(Miss::Action));
    }

    #[test]
    fn test_actions_share_one_receiver() {
        struct Counter(AtomicUsize);

        let mut builder = RouteTable::builder();
        builder
            .route("counter", Counter(AtomicUsize::new(0)))
            .unwrap()
            .action("bump", |c: &Counter| (c.0.fetch_add(1, Ordering::SeqCst) + 1).to_string())
            .unwrap()
            .action("get", |c: &Counter| c.0.load(Ordering::SeqCst).to_string())
            .unwrap();
        let table = builder.build();

        table.lookup("counter", "bump").unwrap()();
        table.lookup("counter", "bump").unwrap()();
        assert_eq!(table.lookup("counter", "get").unwrap()(), "2");
        assert!(table.route("counter").unwrap().receiver().ends_with("Counter"));
    }

    #[test]
    fn test_name_collisions_are_rejected() {
        let mut builder = RouteTable::builder();
        builder.resource(users()).unwrap();
        assert_eq!(
            builder.route("USERS", ()).err(),
            Some(ConfigError::DuplicateRoute("users".to_string()))
        );

        let err = builder
            .route("orders", ())
            .unwrap()
            .action("List", |_: &()| String::new())
            .unwrap()
            .action("list", |_: &()| String::new())
            .err();
        assert_eq!(
            err,
            Some(ConfigError::DuplicateAction {
                route: "orders".to_string(),
                action: "list".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_names_are_rejected() {
        let mut builder = RouteTable::builder();
        assert_eq!(builder.route("", ()).err(), Some(ConfigError::EmptyName));
        assert_eq!(
            builder.route("x", ()).unwrap().action("", |_: &()| String::new()).err(),
            Some(ConfigError::EmptyName)
        );
    }
}
