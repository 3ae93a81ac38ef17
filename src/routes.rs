// routes.rs

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Route {
    pub path: String,
    pub name: String,
}

/// Ordered path -> display name registry of the site's pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(default_routes())
    }
}

impl RouteTable {
    /// Later duplicates of a path are dropped.
    pub fn new(routes: Vec<Route>) -> Self {
        let mut table = Self { routes: Vec::with_capacity(routes.len()) };
        for route in routes {
            if table.name_of(&route.path).is_none() {
                table.routes.push(route);
            }
        }
        table
    }

    pub fn name_of(&self, path: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|r| r.path == path)
            .map(|r| r.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

pub fn default_routes() -> Vec<Route> {
    [
        ("/", "Home"),
        ("/about", "About"),
        ("/projects", "Projects"),
        ("/blog", "Blog"),
        ("/contact", "Contact"),
    ]
    .into_iter()
    .map(|(path, name)| Route { path: path.into(), name: name.into() })
    .collect()
}
