/// Age/level bands a student competes in.
pub const STUDENT_CATEGORIES: [&str; 6] = ["Bidaya", "Ula", "Thaniyya", "Thanawiyya", "Aliya", "Kulliyya"];

/// Programs use the student bands plus an open "General" band.
pub const PROGRAM_CATEGORIES: [&str; 7] =
    ["Bidaya", "Ula", "Thaniyya", "Thanawiyya", "Aliya", "Kulliyya", "General"];
