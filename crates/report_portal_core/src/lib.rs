pub mod controller;
pub mod domain;
pub mod ports;
pub mod query;
pub mod session;
pub mod validator;
pub mod view;

pub use controller::{PortalProfile, PortalSettings, ViewController};
pub use domain::{DateRange, FilterCriteria, PageState, Portal, Report, ReportStatus, Session};
pub use ports::{Clock, FixedClock, MemoryStorage, PortError, PortResult, ReportCatalog, SessionStorage};
pub use session::SessionStore;
pub use validator::{AuthPolicy, LoginForm, SignupForm, ValidationError};
pub use view::{DetailView, FilterOptions, Navigation, RenderModel, ReportDetail, ReportDownload, ReportRow};
