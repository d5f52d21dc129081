// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    EligibilityCriteria, IncomeRange, Institution, MatchWeights, Role, Scheme, SchemeMatch,
    SchemeType, Student, StudentProfile, Teacher, User,
};
pub use requests::{
    BulkDeleteRequest, ChatRequest, ListQuery, LoginRequest, RegisterRequest, SchemeQuery,
    UpdateUserRequest,
};
pub use responses::{
    ApiMessage, AuthResponse, BulkReport, BulkResponse, ChatResponse, DashboardData,
    DashboardResponse, HealthResponse, ItemResponse, ListResponse, MeResponse, StudentStats,
    UserInfo, UserStats,
};
