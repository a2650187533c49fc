//! Front-end route table.
//!
//! An immutable list of `(path, name, view factory)` entries. Views are
//! produced on demand by calling the factory, so nothing is built until a
//! route is actually visited.

/// Page a route renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Scenarios,
    TestCases,
    QuickGenerate,
    Configs,
}

#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub view: fn() -> View,
}

impl Route {
    pub fn load(&self) -> View {
        (self.view)()
    }
}

pub static ROUTES: &[Route] = &[
    Route { path: "/", name: "Home", view: || View::Home },
    Route { path: "/scenarios", name: "Scenarios", view: || View::Scenarios },
    Route { path: "/test-cases", name: "TestCases", view: || View::TestCases },
    Route { path: "/quick-generate", name: "QuickGenerate", view: || View::QuickGenerate },
    Route { path: "/configs", name: "Configs", view: || View::Configs },
];

/// Route for a location, ignoring its query string and a trailing slash.
pub fn resolve(location: &str) -> Option<&'static Route> {
    let path = location.split(['?', '#']).next().unwrap_or_default();
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    ROUTES.iter().find(|route| route.path == path)
}

pub fn by_name(name: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.name == name)
}
