//! Route table and path resolution

use crate::domain::Feature;
use crate::error::{AppError, Result};
use std::collections::BTreeMap;

/// Named routes of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Home,
    Login,
    Register,
    Admin,
    Dashboard,
    Owners,
    Locations,
    Properties,
    PropertyDetails,
    Units,
    Tenants,
    Tenancies,
    Bills,
    Payments,
    Notifications,
    Profiles,
    SubscriptionPlans,
}

impl RouteName {
    pub const ALL: [RouteName; 17] = [
        RouteName::Home,
        RouteName::Login,
        RouteName::Register,
        RouteName::Admin,
        RouteName::Dashboard,
        RouteName::Owners,
        RouteName::Locations,
        RouteName::Properties,
        RouteName::PropertyDetails,
        RouteName::Units,
        RouteName::Tenants,
        RouteName::Tenancies,
        RouteName::Bills,
        RouteName::Payments,
        RouteName::Notifications,
        RouteName::Profiles,
        RouteName::SubscriptionPlans,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Home => "home",
            RouteName::Login => "login",
            RouteName::Register => "register",
            RouteName::Admin => "admin",
            RouteName::Dashboard => "dashboard",
            RouteName::Owners => "owners",
            RouteName::Locations => "locations",
            RouteName::Properties => "properties",
            RouteName::PropertyDetails => "property-details",
            RouteName::Units => "units",
            RouteName::Tenants => "tenants",
            RouteName::Tenancies => "tenancies",
            RouteName::Bills => "bills",
            RouteName::Payments => "payments",
            RouteName::Notifications => "notifications",
            RouteName::Profiles => "profiles",
            RouteName::SubscriptionPlans => "subscription-plans",
        }
    }
}

impl std::str::FromStr for RouteName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        RouteName::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("Unknown route: {}", s))
    }
}

impl std::fmt::Display for RouteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a navigation should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    Named {
        name: RouteName,
        params: BTreeMap<String, String>,
        query: BTreeMap<String, String>,
    },
    Path(String),
}

impl RouteTarget {
    pub fn named(name: RouteName) -> Self {
        RouteTarget::Named {
            name,
            params: BTreeMap::new(),
            query: BTreeMap::new(),
        }
    }

    pub fn path(path: impl Into<String>) -> Self {
        RouteTarget::Path(path.into())
    }

    /// Add a query parameter; path targets get it appended to the URL.
    pub fn with_query(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            RouteTarget::Named {
                name,
                params,
                mut query,
            } => {
                query.insert(key.into(), value.into());
                RouteTarget::Named {
                    name,
                    params,
                    query,
                }
            }
            RouteTarget::Path(path) => {
                let sep = if path.contains('?') { '&' } else { '?' };
                RouteTarget::Path(format!("{}{}{}={}", path, sep, key.into(), value.into()))
            }
        }
    }

    pub fn with_param(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            RouteTarget::Named {
                name,
                mut params,
                query,
            } => {
                params.insert(key.into(), value.into());
                RouteTarget::Named {
                    name,
                    params,
                    query,
                }
            }
            other => other,
        }
    }

    /// Route name, for named targets
    pub fn name(&self) -> Option<RouteName> {
        match self {
            RouteTarget::Named { name, .. } => Some(*name),
            RouteTarget::Path(_) => None,
        }
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        match self {
            RouteTarget::Named { query, .. } => query.get(key).map(String::as_str),
            RouteTarget::Path(_) => None,
        }
    }
}

impl std::fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteTarget::Named { name, query, .. } => {
                write!(f, "{}", name)?;
                write_query(f, query)
            }
            RouteTarget::Path(path) => f.write_str(path),
        }
    }
}

fn write_query(
    f: &mut std::fmt::Formatter<'_>,
    query: &BTreeMap<String, String>,
) -> std::fmt::Result {
    for (i, (k, v)) in query.iter().enumerate() {
        let sep = if i == 0 { '?' } else { '&' };
        write!(f, "{}{}={}", sep, k, v)?;
    }
    Ok(())
}

/// One entry of the route table
#[derive(Debug, Clone)]
pub struct RouteRecord {
    pub name: Option<RouteName>,
    pub path: &'static str,
    pub requires_auth: bool,
    pub required_feature: Option<Feature>,
    pub redirect: Option<RouteName>,
}

impl RouteRecord {
    fn view(name: RouteName, path: &'static str, requires_auth: bool) -> Self {
        Self {
            name: Some(name),
            path,
            requires_auth,
            required_feature: None,
            redirect: None,
        }
    }

    fn gated(name: RouteName, path: &'static str, feature: Feature) -> Self {
        Self {
            required_feature: Some(feature),
            ..Self::view(name, path, true)
        }
    }

    fn redirect(path: &'static str, to: RouteName) -> Self {
        Self {
            name: None,
            path,
            requires_auth: false,
            required_feature: None,
            redirect: Some(to),
        }
    }
}

/// A route after path matching and redirect resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub name: RouteName,
    pub path: String,
    pub params: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    pub requires_auth: bool,
    pub required_feature: Option<Feature>,
}

impl NavigationRequest {
    /// Whether the route lives in the unauthenticated-only `/auth` area
    pub fn is_auth_area(&self) -> bool {
        self.path == "/auth" || self.path.starts_with("/auth/")
    }
}

const MAX_REDIRECTS: usize = 8;

/// The dashboard's route table.
///
/// Children of the `/admin` layout inherit its authentication requirement;
/// the `/auth` area and public pages do not require authentication.
#[derive(Debug, Clone)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    pub fn new() -> Self {
        use RouteName::*;

        let records = vec![
            RouteRecord::view(Home, "/", false),
            RouteRecord::view(Dashboard, "/admin", true),
            RouteRecord::view(Owners, "/admin/owners", true),
            RouteRecord::view(Locations, "/admin/locations", true),
            RouteRecord::view(Properties, "/admin/properties", true),
            RouteRecord::view(PropertyDetails, "/admin/properties/:id", true),
            RouteRecord::view(Units, "/admin/units", true),
            RouteRecord::view(Tenants, "/admin/tenants", true),
            RouteRecord::view(Tenancies, "/admin/tenancies", true),
            RouteRecord::gated(Bills, "/admin/bills", Feature::PaymentTracking),
            RouteRecord::gated(Payments, "/admin/payments", Feature::PaymentTracking),
            RouteRecord::gated(
                Notifications,
                "/admin/notifications",
                Feature::SmsNotifications,
            ),
            RouteRecord::view(Profiles, "/admin/profiles", true),
            RouteRecord::view(SubscriptionPlans, "/admin/subscription/plans", true),
            RouteRecord::redirect("/admin/subscription/upgrade", SubscriptionPlans),
            RouteRecord::redirect("/admin/subscription/renew", SubscriptionPlans),
            RouteRecord::view(Register, "/register", false),
            RouteRecord::view(Login, "/auth/login", false),
            RouteRecord::redirect("/auth", Login),
            RouteRecord::redirect("/login", Login),
        ];

        Self { records }
    }

    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    /// Record for a route name. `admin` names the layout and redirects to
    /// the dashboard.
    fn record_for(&self, name: RouteName) -> Option<&RouteRecord> {
        let name = if name == RouteName::Admin {
            RouteName::Dashboard
        } else {
            name
        };
        self.records.iter().find(|r| r.name == Some(name))
    }

    /// Build the concrete path for a named route.
    pub fn href(&self, name: RouteName, params: &BTreeMap<String, String>) -> Result<String> {
        let record = self
            .record_for(name)
            .ok_or_else(|| AppError::NotFound(format!("route {}", name)))?;

        let mut segments = Vec::new();
        for segment in record.path.split('/').filter(|s| !s.is_empty()) {
            match segment.strip_prefix(':') {
                Some(param) => {
                    let value = params.get(param).ok_or_else(|| {
                        AppError::Internal(anyhow::anyhow!(
                            "Missing param '{}' for route {}",
                            param,
                            name
                        ))
                    })?;
                    segments.push(value.clone());
                }
                None => segments.push(segment.to_string()),
            }
        }
        Ok(format!("/{}", segments.join("/")))
    }

    /// Resolve a target into a concrete route, following redirect records.
    /// Unknown paths fall back to `home`.
    pub fn resolve(&self, target: &RouteTarget) -> Result<NavigationRequest> {
        let (mut path, mut query) = match target {
            RouteTarget::Named {
                name,
                params,
                query,
            } => (self.href(*name, params)?, query.clone()),
            RouteTarget::Path(raw) => split_query(raw),
        };

        for _ in 0..MAX_REDIRECTS {
            let matched = self
                .records
                .iter()
                .find_map(|r| match_path(r.path, &path).map(|params| (r, params)));

            let Some((record, params)) = matched else {
                path = "/".to_string();
                query.clear();
                continue;
            };

            if let Some(to) = record.redirect {
                path = self.href(to, &BTreeMap::new())?;
                continue;
            }

            let name = record
                .name
                .ok_or_else(|| anyhow::anyhow!("Unnamed route record"))?;

            return Ok(NavigationRequest {
                name,
                path,
                params,
                query,
                requires_auth: record.requires_auth,
                required_feature: record.required_feature,
            });
        }

        Err(AppError::Internal(anyhow::anyhow!(
            "Too many redirects resolving {}",
            target
        )))
    }
}

fn split_query(raw: &str) -> (String, BTreeMap<String, String>) {
    let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
    let query = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (k.to_string(), v.to_string())
        })
        .collect();
    (normalize_path(path), query)
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Match `path` against a pattern with `:param` segments.
fn match_path(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let pattern_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = BTreeMap::new();
    for (p, s) in pattern_segments.iter().zip(&path_segments) {
        match p.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_string(), s.to_string());
            }
            None if p == s => {}
            None => return None,
        }
    }
    Some(params)
}
